//! Minimal host template syntax with pluggable tags.
//!
//! Two constructs are understood:
//!
//! - `{{ name }}` interpolates a context variable (`{{ name? }}` renders an
//!   empty string when the variable is missing),
//! - `{% tag literal text %}` invokes a registered tag.
//!
//! Tags follow a two-phase contract. At parse time the registered factory is
//! called once with the literal text after the tag name; the resulting
//! [`Tag`] is stored in the parsed [`Template`]. At render time the tag gets a
//! fresh [`RenderContext`] on every invocation and returns the text to splice
//! into the output.
//!
//! ```text
//! <footer>{% render_time Rendered at: %}</footer>
//!          └── factory("Rendered at:") at parse, tag.render(ctx) per render
//! ```

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown tag '{tag}' in template {template}")]
    UnknownTag { template: String, tag: String },
    #[error("unclosed {{% delimiter in template {0}")]
    UnclosedTag(String),
    #[error("unclosed {{{{ delimiter in template {0}")]
    UnclosedVariable(String),
    #[error("missing required variable '{variable}' in template {template}")]
    MissingVariable { template: String, variable: String },
}

pub type Result<T> = std::result::Result<T, TemplateError>;

/// Named values available during one render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A parsed tag instance, rendered once per template render.
///
/// Implementations must not hold mutable state that changes between renders.
pub trait Tag: Send + Sync {
    fn render(&self, context: &RenderContext) -> String;
}

/// Builds a [`Tag`] from the literal markup found at its call site.
pub type TagFactory = Box<dyn Fn(&str) -> Box<dyn Tag> + Send + Sync>;

/// Wrap a tag constructor as a [`TagFactory`].
pub fn tag_factory<F, T>(build: F) -> TagFactory
where
    F: Fn(&str) -> T + Send + Sync + 'static,
    T: Tag + 'static,
{
    Box::new(move |markup: &str| -> Box<dyn Tag> { Box::new(build(markup)) })
}

/// The host's extension point for custom tags.
pub trait TagRegistrar {
    fn register_tag(&mut self, name: &str, factory: TagFactory);
}

/// Tags known to the template parser, by name.
#[derive(Default)]
pub struct TagRegistry {
    factories: HashMap<String, TagFactory>,
}

impl TagRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered tag names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn build(&self, name: &str, markup: &str) -> Option<Box<dyn Tag>> {
        self.factories.get(name).map(|factory| factory(markup))
    }
}

impl TagRegistrar for TagRegistry {
    fn register_tag(&mut self, name: &str, factory: TagFactory) {
        self.factories.insert(name.to_string(), factory);
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.names())
            .finish()
    }
}

enum Node {
    Text(String),
    Variable { name: String, optional: bool },
    Tag(Box<dyn Tag>),
}

/// A template parsed against a [`TagRegistry`].
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse `source`, instantiating every tag it references.
    pub fn parse(name: impl Into<String>, source: &str, tags: &TagRegistry) -> Result<Self> {
        let name = name.into();
        let mut nodes = Vec::new();
        let mut rest = source;

        while let Some(start) = find_open(rest) {
            if start > 0 {
                nodes.push(Node::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            if rest[start..].starts_with("{{") {
                let end = after
                    .find("}}")
                    .ok_or_else(|| TemplateError::UnclosedVariable(name.clone()))?;
                let var = after[..end].trim();
                let (var, optional) = match var.strip_suffix('?') {
                    Some(stripped) => (stripped.trim_end(), true),
                    None => (var, false),
                };
                nodes.push(Node::Variable {
                    name: var.to_string(),
                    optional,
                });
                rest = &after[end + 2..];
            } else {
                let end = after
                    .find("%}")
                    .ok_or_else(|| TemplateError::UnclosedTag(name.clone()))?;
                let body = after[..end].trim();
                let (tag_name, markup) = match body.split_once(char::is_whitespace) {
                    Some((tag_name, markup)) => (tag_name, markup.trim()),
                    None => (body, ""),
                };
                let tag = tags
                    .build(tag_name, markup)
                    .ok_or_else(|| TemplateError::UnknownTag {
                        template: name.clone(),
                        tag: tag_name.to_string(),
                    })?;
                nodes.push(Node::Tag(tag));
                rest = &after[end + 2..];
            }
        }
        if !rest.is_empty() {
            nodes.push(Node::Text(rest.to_string()));
        }

        Ok(Self { name, nodes })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with `context`. Tags see the same context, read-only.
    pub fn render(&self, context: &RenderContext) -> Result<String> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Variable { name, optional } => match context.get(name) {
                    Some(value) => out.push_str(value),
                    None if *optional => {}
                    None => {
                        return Err(TemplateError::MissingVariable {
                            template: self.name.clone(),
                            variable: name.clone(),
                        });
                    }
                },
                Node::Tag(tag) => out.push_str(&tag.render(context)),
            }
        }
        Ok(out)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// Position of the next `{{` or `{%`, whichever comes first.
fn find_open(s: &str) -> Option<usize> {
    match (s.find("{{"), s.find("{%")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
