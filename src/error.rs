//! Error types for stencil

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for stencil
#[derive(Debug, Error)]
pub enum StencilError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl StencilError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            StencilError::Config(_) | StencilError::TomlDeserialize(_) => 2,
            StencilError::Compile(_) => 3,
            StencilError::Resource(_) => 4,
            StencilError::Io(_) => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            StencilError::Compile(err) => match &err.kind {
                CompileErrorKind::UnknownModifier(name) => format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Declare it under [modifiers] in stencil.toml (e.g., {} = \"my_fn\")\n\
                    • Register it as a runtime callback under [modifier_callbacks]\n\
                    • Check that the security policy does not disable it",
                    err, name
                ),
                CompileErrorKind::UnknownFunction(name) => {
                    format!(
                        "{}\n\n\
                        Suggestions:\n\
                        • Declare the function under [functions] in stencil.toml\n\
                        • Check the spelling of '{}' (tag names are case-sensitive)",
                        err, name
                    )
                }
                CompileErrorKind::UnclosedTag(_) | CompileErrorKind::Unbalanced { .. } => {
                    format!(
                        "{}\n\n\
                        Suggestions:\n\
                        • Every {{if}} needs a matching {{/if}}\n\
                        • {{else}} and {{elseif}} may only follow {{if}} or {{elseif}}",
                        err
                    )
                }
                _ => err.to_string(),
            },
            StencilError::Resource(ResourceError::UntrustedDirectory { .. }) => format!(
                "{}\n\n\
                Suggestions:\n\
                • Add the directory to template_dirs or config_dirs\n\
                • List it under [security] secure_dirs",
                self
            ),
            StencilError::Config(msg) => {
                if msg.contains("No stencil.toml") {
                    format!(
                        "{}\n\n\
                        Suggestions:\n\
                        • Create a stencil.toml with a template_dirs entry\n\
                        • Pass --config-file <PATH>\n\
                        • Set STENCIL_CONFIG to the configuration file",
                        msg
                    )
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using StencilError
pub type Result<T> = std::result::Result<T, StencilError>;

/// What went wrong while compiling a tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    #[error("Cannot compile unknown function {0}.")]
    UnknownFunction(String),

    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("unexpected tag {{{tag}}}{}", open_suffix(.open))]
    Unbalanced { tag: String, open: Option<String> },

    #[error("unclosed {{{0}}} tag")]
    UnclosedTag(String),

    #[error("missing '{0}' attribute")]
    MissingAttribute(String),

    #[error("unexpected '{0}' attribute")]
    UnexpectedAttribute(String),

    #[error("too many shorthand attributes")]
    TooManyPositional,

    #[error("duplicate attribute '{0}'")]
    DuplicateAttribute(String),

    #[error("{0}")]
    Invalid(String),
}

fn open_suffix(open: &Option<String>) -> String {
    match open {
        Some(family) => format!(", {{{}}} is still open", family),
        None => String::new(),
    }
}

/// Fatal error for one compile unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub tag: Option<String>,
    pub line: Option<u32>,
    pub template: Option<String>,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind) -> Self {
        CompileError {
            kind,
            tag: None,
            line: None,
            template: None,
        }
    }

    /// Attach the tag being compiled, keeping any tag already recorded
    pub fn in_tag(mut self, tag: &str) -> Self {
        if self.tag.is_none() {
            self.tag = Some(tag.to_string());
        }
        self
    }

    /// Attach line and template, keeping values already recorded
    pub fn at(mut self, template: Option<&str>, line: Option<u32>) -> Self {
        if self.template.is_none() {
            self.template = template.map(str::to_string);
        }
        if self.line.is_none() {
            self.line = line;
        }
        self
    }
}

impl From<CompileErrorKind> for CompileError {
    fn from(kind: CompileErrorKind) -> Self {
        CompileError::new(kind)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Syntax error")?;
        if let Some(template) = &self.template {
            write!(f, " in template \"{}\"", template)?;
        }
        if let Some(line) = self.line {
            write!(f, " on line {}", line)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, " in {{{}}}", tag)?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for CompileError {}

/// Fatal error for one resolution request
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Unable to read {class} {kind} '{name}'")]
    Unreadable {
        class: &'static str,
        kind: String,
        name: String,
    },

    #[error("Template '{name}' cannot be relative to template of resource type '{kind}'")]
    IncompatibleParent { name: String, kind: String },

    #[error("directory '{}' not allowed by security setting", .path.display())]
    UntrustedDirectory { path: PathBuf },

    #[error("Resource type '{0}' cannot be resolved on the file system")]
    UnsupportedKind(String),
}
