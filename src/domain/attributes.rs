//! Attribute validation against a tag compiler's declared schema

use super::context::CompilerContext;
use super::tag::TagNode;
use crate::error::{CompileError, CompileErrorKind};
use indexmap::IndexMap;

/// Optional-name wildcard: accept any additional named attribute
pub const ANY_ATTRIBUTE: &str = "_any";

/// Reserved attribute marking a single tag as not cacheable
pub const NOCACHE_ATTRIBUTE: &str = "nocache";

/// Attributes accepted by a tag compiler
///
/// The reserved `nocache` attribute is accepted by every schema, named or as
/// a bare positional word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    pub required: Vec<String>,
    pub optional: Vec<String>,
    /// Names assigned to positional values, left to right
    pub shorttag_order: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, list: &[&str]) -> Self {
        self.required = names(list);
        self
    }

    pub fn optional(mut self, list: &[&str]) -> Self {
        self.optional = names(list);
        self
    }

    pub fn shorttag(mut self, list: &[&str]) -> Self {
        self.shorttag_order = names(list);
        self
    }

    fn accepts(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
            || self.optional.iter().any(|n| n == name || n == ANY_ATTRIBUTE)
    }

    /// Map a tag's raw arguments onto this schema
    ///
    /// The reserved `nocache` attribute is consumed here: a truthy value sets
    /// `ctx.tag_nocache` and the attribute is never part of the result.
    pub fn resolve(
        &self,
        ctx: &mut CompilerContext<'_>,
        tag: &TagNode,
    ) -> Result<IndexMap<String, String>, CompileError> {
        let mut attrs: IndexMap<String, String> = IndexMap::new();
        let mut slot = 0;

        for value in &tag.positional {
            if value.trim() == NOCACHE_ATTRIBUTE {
                ctx.tag_nocache = true;
                continue;
            }

            let Some(name) = self.shorttag_order.get(slot) else {
                return Err(ctx.trigger_error(CompileErrorKind::TooManyPositional));
            };
            attrs.insert(name.clone(), value.clone());
            slot += 1;
        }

        for (name, value) in &tag.attributes {
            if name == NOCACHE_ATTRIBUTE {
                if is_truthy(value) {
                    ctx.tag_nocache = true;
                }
                continue;
            }
            if !self.accepts(name) {
                return Err(ctx.trigger_error(CompileErrorKind::UnexpectedAttribute(name.clone())));
            }
            if attrs.contains_key(name) {
                return Err(ctx.trigger_error(CompileErrorKind::DuplicateAttribute(name.clone())));
            }
            attrs.insert(name.clone(), value.clone());
        }

        if let Some(missing) = self.required.iter().find(|n| !attrs.contains_key(*n)) {
            return Err(ctx.trigger_error(CompileErrorKind::MissingAttribute(missing.clone())));
        }

        Ok(attrs)
    }
}

/// Whether a compiled attribute expression is a literal true value
pub fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "null" | "''" | "\"\""
    )
}
