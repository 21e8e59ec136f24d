//! Site configuration module.
//!
//! Handles loading, validating, and merging the site's `config.toml`. Stock
//! defaults are the base layer; the user's file only needs the keys it wants
//! to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # category_dir = "categories"          # Base path for category index pages
//! # category_title_prefix = "Category: " # Prepended to each label for the title
//! layouts_dir = "_layouts"               # Where layout templates live
//!
//! [render_time]
//! format = "%Y-%m-%d %H:%M:%S %z"        # chrono strftime format
//! ```
//!
//! `category_dir` and `category_title_prefix` are overrides: when absent the
//! category indexer falls back to its own defaults, so hosts that never write
//! a config still get `categories/<label>` pages titled `Category: <label>`.
//!
//! Unknown keys are rejected to catch typos early.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Base directory for category index pages, relative to the site root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_dir: Option<String>,
    /// Prefix prepended to each category label to form the index title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_title_prefix: Option<String>,
    /// Directory holding layout templates, relative to the site root.
    pub layouts_dir: String,
    /// Settings for the `render_time` template tag.
    pub render_time: RenderTimeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            category_dir: None,
            category_title_prefix: None,
            layouts_dir: "_layouts".to_string(),
            render_time: RenderTimeConfig::default(),
        }
    }
}

/// `render_time` tag settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderTimeConfig {
    /// chrono strftime format for the timestamp.
    pub format: String,
}

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

impl Default for RenderTimeConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl SiteConfig {
    /// Look up a top-level setting by key, as the host's string mapping.
    ///
    /// Only string-valued settings are exposed; unset overrides return `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "category_dir" => self.category_dir.as_deref(),
            "category_title_prefix" => self.category_title_prefix.as_deref(),
            "layouts_dir" => Some(&self.layouts_dir),
            _ => None,
        }
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.category_dir {
            validate_relative_dir("category_dir", dir)?;
        }
        validate_relative_dir("layouts_dir", &self.layouts_dir)?;
        validate_timestamp_format(&self.render_time.format)
    }
}

/// Check a `render_time` format. chrono panics when it formats with an
/// invalid item.
pub fn validate_timestamp_format(format: &str) -> Result<(), ConfigError> {
    if format.is_empty() {
        return Err(ConfigError::Validation(
            "render_time.format must not be empty".into(),
        ));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::Validation(format!(
            "render_time.format is not a valid strftime format: {format:?}"
        )));
    }
    Ok(())
}

fn validate_relative_dir(key: &str, dir: &str) -> Result<(), ConfigError> {
    if dir.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    let path = Path::new(dir);
    if path.is_absolute() {
        return Err(ConfigError::Validation(format!(
            "{key} must be relative to the site root, got {dir:?}"
        )));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ConfigError::Validation(format!(
            "{key} must not contain '..', got {dir:?}"
        )));
    }
    Ok(())
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Categories Configuration
# ===============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Category index pages
# ---------------------------------------------------------------------------
# One index page is generated per distinct category label, but only when the
# site has a `category_index` layout.

# Base directory for index pages, relative to the site root.
# An index for label "rust" is written under <category_dir>/rust.
# category_dir = "categories"

# Prefix prepended to the label to form each index page title.
# category_title_prefix = "Category: "

# ---------------------------------------------------------------------------
# Layouts
# ---------------------------------------------------------------------------
# Directory holding layout templates. A layout is named by its file stem:
# _layouts/category_index.html -> "category_index".
layouts_dir = "_layouts"

# ---------------------------------------------------------------------------
# render_time tag
# ---------------------------------------------------------------------------
# {% render_time Rendered at: %} -> "Rendered at: 2024-05-01 13:45:10 +0200"
[render_time]
# chrono strftime format for the timestamp.
format = "%Y-%m-%d %H:%M:%S %z"
"##
}
