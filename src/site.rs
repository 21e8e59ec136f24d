//! The host side: what the extension needs from a site, and a reference site.
//!
//! [`SiteModel`] is the whole contract the category indexer relies on: the
//! page list, string config values, layout lookup, and an append-only page
//! registration call. Any static site host can implement it over its own
//! page records.
//!
//! [`Site`] is the in-crate implementation used by the CLI and the tests. It
//! loads a site root laid out as:
//!
//! ```text
//! site/
//! ├── config.toml                 # Optional, see `config`
//! ├── pages.json                  # Page manifest: [{title, url, categories}]
//! └── _layouts/
//!     └── category_index.html     # Enables category index generation
//! ```

use crate::config::{self, SiteConfig};
use crate::layout::{LayoutError, Layouts};
use crate::template::{RenderContext, TagRegistry, Template, TemplateError};
use crate::types::{CategoryIndex, PageView};
use maud::{Markup, html};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// File name of the page manifest inside a site root.
pub const PAGES_MANIFEST: &str = "pages.json";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Page manifest error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("No '{0}' layout to render with")]
    MissingLayout(String),
    #[error("No category index for '{0}'")]
    UnknownCategory(String),
}

/// What the category indexer needs from a host site.
pub trait SiteModel {
    /// Content pages, in host order.
    fn pages(&self) -> &[PageView];
    /// A string setting from the site configuration.
    fn config_value(&self, key: &str) -> Option<&str>;
    /// Whether the host can render pages with the named layout.
    fn has_layout(&self, name: &str) -> bool;
    /// Register a generated page. Must not alter existing pages.
    fn add_page(&mut self, page: CategoryIndex);
}

/// Reference host site.
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    pages: Vec<PageView>,
    layouts: Layouts,
    generated: Vec<CategoryIndex>,
}

impl Site {
    pub fn new(config: SiteConfig, pages: Vec<PageView>, layouts: Layouts) -> Self {
        Self {
            config,
            pages,
            layouts,
            generated: Vec::new(),
        }
    }

    /// Load config, page manifest and layouts from a site root.
    ///
    /// A missing `pages.json` means a site with no pages.
    pub fn load(root: &Path) -> Result<Self, SiteError> {
        let config = config::load_config(root)?;
        let pages = load_pages(&root.join(PAGES_MANIFEST))?;
        let layouts = Layouts::discover(&root.join(&config.layouts_dir))?;
        debug!(
            root = %root.display(),
            pages = pages.len(),
            layouts = layouts.names().count(),
            "loaded site"
        );
        Ok(Self::new(config, pages, layouts))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Pages registered through [`SiteModel::add_page`], in registration order.
    pub fn generated(&self) -> &[CategoryIndex] {
        &self.generated
    }

    pub fn find_generated(&self, category: &str) -> Option<&CategoryIndex> {
        self.generated.iter().find(|g| g.category == category)
    }

    /// Category label to the pages filed under it, in page order.
    pub fn categories(&self) -> BTreeMap<&str, Vec<&PageView>> {
        let mut map: BTreeMap<&str, Vec<&PageView>> = BTreeMap::new();
        for page in &self.pages {
            for label in &page.categories {
                let entries = map.entry(label.as_str()).or_default();
                if !entries.iter().any(|p| std::ptr::eq(*p, page)) {
                    entries.push(page);
                }
            }
        }
        map
    }

    /// Render a category index page through its layout.
    ///
    /// The layout sees `title`, `category`, `url`, `page_count` and `pages`
    /// (an HTML list of the pages in the category). Every value is HTML
    /// escaped.
    pub fn render_category_index(
        &self,
        index: &CategoryIndex,
        tags: &TagRegistry,
    ) -> Result<String, SiteError> {
        if !self.layouts.contains(&index.layout) {
            return Err(SiteError::MissingLayout(index.layout.clone()));
        }
        let source = self.layouts.load(&index.layout)?;
        let template = Template::parse(index.layout.as_str(), &source, tags)?;

        let pages: Vec<&PageView> = self
            .pages
            .iter()
            .filter(|p| p.in_category(&index.category))
            .collect();
        let context = RenderContext::new()
            .with_var("title", escape(&index.title))
            .with_var("category", escape(&index.category))
            .with_var("url", escape(&index.url()))
            .with_var("page_count", pages.len().to_string())
            .with_var("pages", page_list(&pages).into_string());

        debug!(
            template = template.name(),
            category = %index.category,
            pages = pages.len(),
            "rendering category index"
        );
        Ok(template.render(&context)?)
    }

    /// Render the generated index for `category`.
    pub fn render_category(&self, category: &str, tags: &TagRegistry) -> Result<String, SiteError> {
        let index = self
            .find_generated(category)
            .ok_or_else(|| SiteError::UnknownCategory(category.to_string()))?;
        self.render_category_index(index, tags)
    }
}

impl SiteModel for Site {
    fn pages(&self) -> &[PageView] {
        &self.pages
    }

    fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key)
    }

    fn has_layout(&self, name: &str) -> bool {
        self.layouts.contains(name)
    }

    fn add_page(&mut self, page: CategoryIndex) {
        self.generated.push(page);
    }
}

fn load_pages(path: &Path) -> Result<Vec<PageView>, SiteError> {
    if !path.exists() {
        debug!(path = %path.display(), "no page manifest");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// HTML list of page links for a category index.
fn page_list(pages: &[&PageView]) -> Markup {
    html! {
        ul.category-pages {
            @for page in pages {
                li {
                    a href=(page.url) { (page.title) }
                }
            }
        }
    }
}
