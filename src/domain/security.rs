//! Security gate consulted by the compiler and the resource resolver

use super::context::CompilerContext;
use crate::error::ResourceError;
use std::path::{Path, PathBuf};

/// Boolean trust queries made during compilation and resolution
pub trait SecurityGate: Send + Sync {
    /// Whether a modifier may be used; a `false` answer drops the step silently
    fn is_trusted_modifier(&self, name: &str, ctx: &CompilerContext<'_>) -> bool;

    /// Veto a resolved resource path
    fn is_trusted_resource_dir(&self, path: &Path, is_config: bool) -> Result<(), ResourceError>;
}

/// Rule-list security policy
///
/// Directory lists must hold normalized absolute paths.
#[derive(Debug, Clone, Default)]
pub struct SecurityPolicy {
    pub template_dirs: Vec<PathBuf>,
    pub config_dirs: Vec<PathBuf>,
    pub secure_dirs: Vec<PathBuf>,
    /// Empty means every modifier is allowed
    pub allowed_modifiers: Vec<String>,
    pub disabled_modifiers: Vec<String>,
}

impl SecurityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trust_template_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.template_dirs.extend(dirs);
        self
    }

    pub fn trust_config_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.config_dirs.extend(dirs);
        self
    }

    pub fn secure_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.secure_dirs.extend(dirs);
        self
    }

    pub fn allow_modifiers(mut self, names: &[&str]) -> Self {
        self.allowed_modifiers
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn disable_modifiers(mut self, names: &[&str]) -> Self {
        self.disabled_modifiers
            .extend(names.iter().map(|n| n.to_string()));
        self
    }
}

impl SecurityGate for SecurityPolicy {
    fn is_trusted_modifier(&self, name: &str, _ctx: &CompilerContext<'_>) -> bool {
        if self.disabled_modifiers.iter().any(|m| m == name) {
            return false;
        }
        self.allowed_modifiers.is_empty() || self.allowed_modifiers.iter().any(|m| m == name)
    }

    fn is_trusted_resource_dir(&self, path: &Path, is_config: bool) -> Result<(), ResourceError> {
        let class_dirs = if is_config {
            &self.config_dirs
        } else {
            &self.template_dirs
        };

        let trusted = class_dirs
            .iter()
            .chain(self.secure_dirs.iter())
            .any(|dir| path.starts_with(dir));

        if trusted {
            Ok(())
        } else {
            Err(ResourceError::UntrustedDirectory {
                path: path.parent().unwrap_or(path).to_path_buf(),
            })
        }
    }
}
