//! Category indexer.
//!
//! Collects the distinct category labels declared across a site's pages and
//! registers one [`CategoryIndex`] page per label with the host. Nothing is
//! generated unless the host can render the result, i.e. it has a
//! `category_index` layout.
//!
//! ```text
//! pages                            generated
//! "Hello"   [rust, notes]    →     categories/notes   "Category: notes"
//! "Borrow"  [rust]                 categories/rust    "Category: rust"
//! "Travel"  []
//! ```
//!
//! Labels are compared by exact string equality: `Rust` and `rust` are two
//! categories. Indexes are registered in ascending label order.

use crate::site::SiteModel;
use crate::types::{CATEGORY_INDEX_LAYOUT, CategoryIndex, PageView};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Config key for the base directory of category index pages.
pub const CATEGORY_DIR_KEY: &str = "category_dir";
/// Config key for the title prefix of category index pages.
pub const TITLE_PREFIX_KEY: &str = "category_title_prefix";

pub const DEFAULT_CATEGORY_DIR: &str = "categories";
pub const DEFAULT_TITLE_PREFIX: &str = "Category: ";

/// Generate one category index page per distinct label and add them to `site`.
///
/// A site without a `category_index` layout is left untouched.
pub fn generate<S: SiteModel + ?Sized>(site: &mut S) {
    if !site.has_layout(CATEGORY_INDEX_LAYOUT) {
        debug!(
            layout = CATEGORY_INDEX_LAYOUT,
            "layout not found, skipping category indexes"
        );
        return;
    }

    let dir = site
        .config_value(CATEGORY_DIR_KEY)
        .unwrap_or(DEFAULT_CATEGORY_DIR)
        .to_string();
    let prefix = site
        .config_value(TITLE_PREFIX_KEY)
        .unwrap_or(DEFAULT_TITLE_PREFIX)
        .to_string();

    let indexes = category_indexes(site.pages(), &dir, &prefix);
    let count = indexes.len();
    for index in indexes {
        debug!(category = %index.category, path = %index.path.display(), "adding category index");
        site.add_page(index);
    }
    info!(count, dir = %dir, "generated category indexes");
}

/// Build the category index pages for `pages` without touching a host.
pub fn category_indexes(pages: &[PageView], dir: &str, prefix: &str) -> Vec<CategoryIndex> {
    distinct_categories(pages)
        .into_iter()
        .map(|label| CategoryIndex::new(label, dir, prefix))
        .collect()
}

/// The set of distinct category labels across all pages.
pub fn distinct_categories(pages: &[PageView]) -> BTreeSet<&str> {
    pages
        .iter()
        .flat_map(|p| p.categories.iter().map(String::as_str))
        .collect()
}
