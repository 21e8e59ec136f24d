//! Layout discovery.
//!
//! A layout is any file inside the layouts directory; its name is the file
//! stem. Nested directories are searched too, so `_layouts/blog/post.html`
//! registers as `post`. Hidden files and everything under hidden directories
//! are ignored. When two files share a stem the first one in sorted path
//! order wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk layouts directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Layout not found: {0}")]
    NotFound(String),
}

/// The layouts a site can render with, by name.
#[derive(Debug, Clone, Default)]
pub struct Layouts {
    layouts: BTreeMap<String, PathBuf>,
}

impl Layouts {
    /// Discover layouts under `dir`. A missing directory means no layouts.
    pub fn discover(dir: &Path) -> Result<Self, LayoutError> {
        let mut layouts = BTreeMap::new();
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no layouts directory");
            return Ok(Self { layouts });
        }

        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(existing) = layouts.get(&stem) {
                warn!(
                    layout = %stem,
                    kept = %existing.display(),
                    ignored = %path.display(),
                    "duplicate layout name"
                );
                continue;
            }
            layouts.insert(stem, path.to_path_buf());
        }

        debug!(dir = %dir.display(), count = layouts.len(), "discovered layouts");
        Ok(Self { layouts })
    }

    /// Build from explicit name/path pairs.
    pub fn from_paths<I, N, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            layouts: entries
                .into_iter()
                .map(|(n, p)| (n.into(), p.into()))
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.layouts.get(name).map(PathBuf::as_path)
    }

    /// Read a layout's source.
    pub fn load(&self, name: &str) -> Result<String, LayoutError> {
        let path = self
            .path(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))?;
        Ok(fs::read_to_string(path)?)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
