//! Shared test utilities.
//!
//! Fixture setup, in-memory sites, lookups that panic with a useful message,
//! and clocks that pin or step time for `render_time` assertions.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut site = site_with_layout(vec![PageView::new("A", "/a/", &["x"])]);
//! categories::generate(&mut site);
//! assert_eq!(find_index(&site, "x").title, "Category: x");
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, FixedOffset};
use tempfile::TempDir;

use crate::config::{RenderTimeConfig, SiteConfig};
use crate::layout::Layouts;
use crate::site::Site;
use crate::tags::{self, Clock};
use crate::template::TagRegistry;
use crate::types::{CATEGORY_INDEX_LAYOUT, CategoryIndex, PageView};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// In-memory sites
// =========================================================================

/// A site that has a `category_index` layout (never read from disk).
pub fn site_with_layout(pages: Vec<PageView>) -> Site {
    site_with_config(SiteConfig::default(), pages)
}

/// Like [`site_with_layout`], with a custom config.
pub fn site_with_config(config: SiteConfig, pages: Vec<PageView>) -> Site {
    let layouts = Layouts::from_paths([(CATEGORY_INDEX_LAYOUT, "category_index.html")]);
    Site::new(config, pages, layouts)
}

/// A site with no layouts at all.
pub fn site_without_layout(pages: Vec<PageView>) -> Site {
    Site::new(SiteConfig::default(), pages, Layouts::default())
}

// =========================================================================
// Lookups — panic with a clear message on miss
// =========================================================================

/// Find a generated category index by label. Panics if not found.
pub fn find_index<'a>(site: &'a Site, category: &str) -> &'a CategoryIndex {
    site.find_generated(category).unwrap_or_else(|| {
        let labels = generated_categories(site);
        panic!("category index '{category}' not found. Available: {labels:?}")
    })
}

/// Labels of all generated indexes, in registration order.
pub fn generated_categories(site: &Site) -> Vec<&str> {
    site.generated()
        .iter()
        .map(|g| g.category.as_str())
        .collect()
}

// =========================================================================
// Clocks
// =========================================================================

/// Parse an RFC 3339 timestamp.
pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// Always returns the same instant.
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Advances one second on every read.
pub struct SteppingClock(Mutex<DateTime<FixedOffset>>);

impl SteppingClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self(Mutex::new(start))
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let mut current = self.0.lock().unwrap();
        let now = *current;
        *current = now + Duration::seconds(1);
        now
    }
}

/// A registry with `render_time` pinned to 2024-05-01 13:45:10 UTC.
pub fn fixed_time_tags() -> TagRegistry {
    let mut registry = TagRegistry::new();
    tags::register(
        &mut registry,
        &RenderTimeConfig::default(),
        Arc::new(FixedClock(at("2024-05-01T13:45:10+00:00"))),
    )
    .unwrap();
    registry
}
