//! URL templates with `%{name}` placeholders.
//!
//! # Design Decisions
//! - Placeholder names are collected once, distinct, in first-seen order
//! - Rendering fails on the first placeholder without a value
//! - Values are substituted verbatim, without percent-encoding
//! - A `%{` with no closing brace is literal text

use crate::service::error::UnboundTemplateVariable;
use crate::service::kind::ServiceKind;

const OPEN: &str = "%{";
const CLOSE: char = '}';

/// A parsed URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: &'static str,
    placeholders: Vec<&'static str>,
}

impl Template {
    pub fn new(source: &'static str) -> Self {
        let mut placeholders = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            let after = &rest[start + OPEN.len()..];
            let Some(end) = after.find(CLOSE) else {
                break;
            };
            let name = &after[..end];
            if !placeholders.contains(&name) {
                placeholders.push(name);
            }
            rest = &after[end + 1..];
        }

        Self {
            source,
            placeholders,
        }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Distinct placeholder names, in order of first appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.placeholders.iter().copied()
    }

    /// Substitute every placeholder using `lookup`.
    ///
    /// All placeholders are checked before any substitution happens, so a
    /// partially rendered URL is never produced.
    pub fn render<'v, F>(&self, service: ServiceKind, lookup: F) -> Result<String, UnboundTemplateVariable>
    where
        F: Fn(&str) -> Option<&'v str>,
    {
        let mut values = Vec::with_capacity(self.placeholders.len());
        for &name in &self.placeholders {
            match lookup(name) {
                Some(value) => values.push((name, value)),
                None => {
                    return Err(UnboundTemplateVariable {
                        placeholder: name.to_string(),
                        service,
                    })
                }
            }
        }

        let mut url = self.source.to_string();
        for (name, value) in values {
            url = url.replace(&format!("{OPEN}{name}{CLOSE}"), value);
        }
        Ok(url)
    }
}
