//! The `render_time` tag.
//!
//! `{% render_time Rendered at: %}` renders as its literal text, one space,
//! and the wall-clock time at the moment the tag is rendered:
//!
//! ```text
//! Rendered at: 2024-05-01 13:45:10 +0200
//! ```
//!
//! The timestamp is taken on every render, not at parse time, so a template
//! parsed once and rendered many times reports each render separately.

use crate::config::{ConfigError, RenderTimeConfig, validate_timestamp_format};
use crate::template::{RenderContext, Tag, TagRegistrar, tag_factory};
use chrono::{DateTime, FixedOffset, Local};
use std::sync::Arc;
use tracing::trace;

pub const RENDER_TIME_TAG: &str = "render_time";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

pub struct RenderTime {
    text: String,
    format: String,
    clock: Arc<dyn Clock>,
}

impl RenderTime {
    /// Build the tag for one call site. Fails if `format` is not a valid
    /// strftime format.
    pub fn new(text: &str, format: &str, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        validate_timestamp_format(format)?;
        Ok(Self::with_checked_format(text, format, clock))
    }

    fn with_checked_format(text: &str, format: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            text: text.to_string(),
            format: format.to_string(),
            clock,
        }
    }
}

impl Tag for RenderTime {
    fn render(&self, _context: &RenderContext) -> String {
        let now = self.clock.now().format(&self.format);
        trace!(text = %self.text, "rendering render_time");
        format!("{} {}", self.text, now)
    }
}

/// Register `render_time` with a host template engine.
///
/// The format is checked once here; nothing is registered if it is invalid.
pub fn register<R: TagRegistrar + ?Sized>(
    registrar: &mut R,
    config: &RenderTimeConfig,
    clock: Arc<dyn Clock>,
) -> Result<(), ConfigError> {
    validate_timestamp_format(&config.format)?;
    let format = config.format.clone();
    registrar.register_tag(
        RENDER_TIME_TAG,
        tag_factory(move |markup| {
            RenderTime::with_checked_format(markup, &format, Arc::clone(&clock))
        }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TIMESTAMP_FORMAT;
    use crate::template::{TagRegistry, Template, TemplateError};
    use crate::test_helpers::{FixedClock, SteppingClock, at};

    fn registry_with(clock: Arc<dyn Clock>) -> TagRegistry {
        let mut tags = TagRegistry::new();
        register(&mut tags, &RenderTimeConfig::default(), clock).unwrap();
        tags
    }

    #[test]
    fn renders_text_space_timestamp() {
        let clock = Arc::new(FixedClock(at("2024-05-01T13:45:10+02:00")));
        let tag = RenderTime::new("Rendered at:", DEFAULT_TIMESTAMP_FORMAT, clock).unwrap();
        assert_eq!(
            tag.render(&RenderContext::new()),
            "Rendered at: 2024-05-01 13:45:10 +0200"
        );
    }

    #[test]
    fn time_is_taken_at_render_not_parse() {
        let clock = Arc::new(SteppingClock::new(at("2024-05-01T13:45:10+00:00")));
        let tags = registry_with(clock);
        let tpl = Template::parse("t", "{% render_time Rendered at: %}", &tags).unwrap();

        let first = tpl.render(&RenderContext::new()).unwrap();
        let second = tpl.render(&RenderContext::new()).unwrap();

        assert_eq!(first, "Rendered at: 2024-05-01 13:45:10 +0000");
        assert_eq!(second, "Rendered at: 2024-05-01 13:45:11 +0000");
        assert_ne!(first, second);
        assert!(second.starts_with("Rendered at: "));
    }

    #[test]
    fn configured_format_is_used() {
        let mut tags = TagRegistry::new();
        let config = RenderTimeConfig {
            format: "%H:%M".to_string(),
        };
        let clock = Arc::new(FixedClock(at("2024-05-01T09:05:00+00:00")));
        register(&mut tags, &config, clock).unwrap();

        let tpl = Template::parse("t", "{% render_time Built %}", &tags).unwrap();
        assert_eq!(tpl.render(&RenderContext::new()).unwrap(), "Built 09:05");
    }

    #[test]
    fn context_values_do_not_leak_into_output() {
        let clock = Arc::new(FixedClock(at("2024-05-01T00:00:00+00:00")));
        let tag = RenderTime::new("At", DEFAULT_TIMESTAMP_FORMAT, clock).unwrap();
        let ctx = RenderContext::new().with_var("title", "ignored");
        assert_eq!(tag.render(&ctx), "At 2024-05-01 00:00:00 +0000");
        assert_eq!(ctx.get("title"), Some("ignored"));
    }

    #[test]
    fn system_clock_output_parses_back() {
        let tag =
            RenderTime::new("Rendered at:", DEFAULT_TIMESTAMP_FORMAT, Arc::new(SystemClock))
                .unwrap();
        let out = tag.render(&RenderContext::new());
        let stamp = out.strip_prefix("Rendered at: ").unwrap();
        assert!(DateTime::parse_from_str(stamp, DEFAULT_TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn register_adds_render_time() {
        let tags = registry_with(Arc::new(SystemClock));
        assert!(tags.contains(RENDER_TIME_TAG));
    }

    #[test]
    fn register_rejects_invalid_format() {
        let mut tags = TagRegistry::new();
        let config = RenderTimeConfig {
            format: "%Y-%m-%".to_string(),
        };
        let err = register(&mut tags, &config, Arc::new(SystemClock)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(!tags.contains(RENDER_TIME_TAG));
        assert!(matches!(
            Template::parse("t", "{% render_time At %}", &tags),
            Err(TemplateError::UnknownTag { .. })
        ));
    }

    #[test]
    fn new_rejects_invalid_format() {
        let clock = Arc::new(FixedClock(at("2024-05-01T00:00:00+00:00")));
        assert!(RenderTime::new("At", "%Y-%m-%", clock.clone()).is_err());
        assert!(RenderTime::new("At", "", clock).is_err());
    }
}
