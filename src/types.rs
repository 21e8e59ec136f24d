//! Shared types passed between the host site and the extension.
//!
//! [`PageView`] is the read-only view of a host page that the indexer and the
//! reference host work with. [`CategoryIndex`] is the artifact the indexer
//! produces, one per distinct category label.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Layout a host must provide for category index artifacts to be generated.
pub const CATEGORY_INDEX_LAYOUT: &str = "category_index";

/// Typed, read-only view of a content page.
///
/// Only the fields the extension consumes are exposed. Hosts build these
/// from their own page records (front matter, manifests, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub title: String,
    pub url: String,
    /// Category labels. Compared by exact string equality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl PageView {
    pub fn new(title: impl Into<String>, url: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Whether this page declares `label` as one of its categories.
    pub fn in_category(&self, label: &str) -> bool {
        self.categories.iter().any(|c| c == label)
    }
}

/// A generated category index page.
///
/// Built once per site build, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryIndex {
    /// The category label this index lists.
    pub category: String,
    /// Display title: configured prefix followed by the label.
    pub title: String,
    /// Output path relative to the site root: category dir joined with the label.
    pub path: PathBuf,
    /// Layout the host renders this page with.
    pub layout: String,
}

impl CategoryIndex {
    pub fn new(category: &str, category_dir: &str, title_prefix: &str) -> Self {
        Self {
            category: category.to_string(),
            title: format!("{title_prefix}{category}"),
            path: index_path(category_dir, category),
            layout: CATEGORY_INDEX_LAYOUT.to_string(),
        }
    }

    /// Site-absolute URL of the index, with a trailing slash.
    pub fn url(&self) -> String {
        let path = self.path.to_string_lossy().replace('\\', "/");
        format!("/{}/", path.trim_matches('/'))
    }
}

/// Join `label` onto `category_dir`, keeping only the label's plain
/// components so the result always stays under the directory.
fn index_path(category_dir: &str, label: &str) -> PathBuf {
    let mut path = PathBuf::from(category_dir);
    for component in Path::new(label).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    path
}
