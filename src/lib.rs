//! # Simple Categories
//!
//! Category index pages and a render-time template tag for static site
//! generators.
//!
//! Two independent pieces plug into a host site:
//!
//! - the **category indexer** ([`categories::generate`]) walks the site's
//!   pages, collects every distinct category label, and registers one
//!   [`types::CategoryIndex`] page per label,
//! - the **`render_time` tag** ([`tags`]) renders its literal text followed by
//!   the wall-clock time at the moment it is rendered.
//!
//! ```text
//! pages.json ──► Site ──► categories::generate ──► categories/<label>
//!                  │                                     │
//!  _layouts/ ──────┘        {% render_time ... %} ◄── category_index layout
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`categories`] | The category indexer |
//! | [`tags`] | The `render_time` tag and its clock |
//! | [`site`] | The `SiteModel` host contract and the reference `Site` |
//! | [`template`] | Host template syntax and the tag registration contract |
//! | [`layout`] | Layout discovery under the layouts directory |
//! | [`config`] | `config.toml` loading, merging, validation |
//! | [`types`] | `PageView` and `CategoryIndex` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Typed Host Seams
//!
//! The extension never inspects host objects reflectively. Pages reach it as
//! [`types::PageView`] (title, URL, categories) and everything else goes
//! through the four methods of [`site::SiteModel`]. A host adapts its own
//! page records once; the indexer stays ignorant of front matter, manifests
//! and file layout.
//!
//! ## Skip, Don't Fail
//!
//! A site without a `category_index` layout has nowhere to render category
//! pages, so the indexer does nothing rather than erroring. Themes opt in by
//! shipping the layout.
//!
//! ## Explicit Tag Registration
//!
//! There is no global tag table. [`tags::register`] is called once with the
//! host's [`template::TagRegistrar`], and the host decides when templates
//! are parsed. Tags are built at parse time from their literal markup and
//! rendered against a fresh context each time.

pub mod categories;
pub mod config;
pub mod layout;
pub mod output;
pub mod site;
pub mod tags;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
