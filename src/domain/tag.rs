//! Parsed tag nodes as delivered by the template parser

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One tag occurrence in the stream, already tokenized
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagNode {
    pub name: String,

    /// Source line of the opening delimiter, when the parser knows it
    #[serde(default)]
    pub line: Option<u32>,

    /// Named attributes in source order (values are compiled expressions)
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Shorttag values in source order
    #[serde(default)]
    pub positional: Vec<String>,

    /// Modifier chain attached to the tag's output
    #[serde(default)]
    pub modifiers: Vec<ModifierInvocation>,
}

impl TagNode {
    pub fn new(name: &str) -> Self {
        TagNode {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn arg(mut self, value: &str) -> Self {
        self.positional.push(value.to_string());
        self
    }

    pub fn modifier(mut self, invocation: ModifierInvocation) -> Self {
        self.modifiers.push(invocation);
        self
    }
}

/// A single `|name:arg:arg` step of a modifier chain
///
/// Slot 0 of `args` is reserved for the piped value and is overwritten when
/// the chain is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ModifierInvocation {
    pub name: String,
    pub args: Vec<String>,
}

impl ModifierInvocation {
    /// Create an invocation with the given extra arguments
    pub fn new(name: &str, extra: &[&str]) -> Self {
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(String::new());
        args.extend(extra.iter().map(|a| a.to_string()));
        ModifierInvocation {
            name: name.to_string(),
            args,
        }
    }

    /// Parse a whole chain such as `upper|truncate:5`
    pub fn parse_chain(chain: &str) -> Result<Vec<Self>, String> {
        chain
            .split('|')
            .filter(|step| !step.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for ModifierInvocation {
    type Err = String;

    /// Parse `name:arg:arg`; quoted arguments may contain `:`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = split_outside_quotes(s.trim(), ':').into_iter();
        let name = parts.next().unwrap_or_default();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(format!("Invalid modifier: '{}'", s));
        }

        let mut args = vec![String::new()];
        args.extend(parts);
        Ok(ModifierInvocation { name, args })
    }
}

impl TryFrom<String> for ModifierInvocation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ModifierInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in self.args.iter().skip(1) {
            write!(f, ":{}", arg)?;
        }
        Ok(())
    }
}

fn split_outside_quotes(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                current.push(c);
            }
            None if c == sep => {
                parts.push(std::mem::take(&mut current).trim().to_string());
            }
            None => current.push(c),
        }
    }
    parts.push(current.trim().to_string());
    parts
}
