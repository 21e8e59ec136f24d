//! CLI output formatting.
//!
//! Output is information-first: each generated index leads with its position
//! and title, followed by where it lands and how many pages it lists.
//!
//! ```text
//! Categories
//! 001 Filed under: Travel Notes (1 page)
//!     Path: categories/Travel Notes
//! 002 Filed under: notes (1 page)
//!     Path: categories/notes
//! 003 Filed under: rust (2 pages)
//!     Path: categories/rust
//!
//! Generated 3 category indexes from 4 pages
//! ```
//!
//! Each `format_*` function returns lines for testability; the `print_*`
//! wrapper writes them to stdout.

use crate::site::{Site, SiteModel};
use crate::types::CATEGORY_INDEX_LAYOUT;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format the result of running the category indexer over `site`.
pub fn format_index_output(site: &Site) -> Vec<String> {
    let mut lines = Vec::new();

    if !site.has_layout(CATEGORY_INDEX_LAYOUT) {
        lines.push(format!(
            "No {CATEGORY_INDEX_LAYOUT} layout, category indexes skipped"
        ));
        return lines;
    }

    let categories = site.categories();
    lines.push("Categories".to_string());
    for (i, index) in site.generated().iter().enumerate() {
        let count = categories
            .get(index.category.as_str())
            .map_or(0, |pages| pages.len());
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            index.title,
            plural(count, "page", "pages")
        ));
        lines.push(format!("{}Path: {}", indent(1), index.path.display()));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} from {}",
        plural(site.generated().len(), "category index", "category indexes"),
        plural(site.pages().len(), "page", "pages")
    ));
    lines
}

pub fn print_index_output(site: &Site) {
    for line in format_index_output(site) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories;
    use crate::test_helpers::*;
    use crate::types::PageView;

    #[test]
    fn lists_generated_indexes_with_counts() {
        let mut site = site_with_layout(vec![
            PageView::new("A", "/a/", &["rust", "notes"]),
            PageView::new("B", "/b/", &["rust"]),
        ]);
        categories::generate(&mut site);

        let lines = format_index_output(&site);
        assert_eq!(
            lines,
            vec![
                "Categories",
                "001 Category: notes (1 page)",
                "    Path: categories/notes",
                "002 Category: rust (2 pages)",
                "    Path: categories/rust",
                "",
                "Generated 2 category indexes from 2 pages",
            ]
        );
    }

    #[test]
    fn reports_skip_without_layout() {
        let mut site = site_without_layout(vec![PageView::new("A", "/a/", &["rust"])]);
        categories::generate(&mut site);
        let lines = format_index_output(&site);
        assert_eq!(lines, vec!["No category_index layout, category indexes skipped"]);
    }

    #[test]
    fn singular_summary() {
        let mut site = site_with_layout(vec![PageView::new("A", "/a/", &["x"])]);
        categories::generate(&mut site);
        let lines = format_index_output(&site);
        assert_eq!(
            lines.last().unwrap(),
            "Generated 1 category index from 1 page"
        );
    }

    #[test]
    fn format_index_zero_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }
}
