//! Configuration management

use super::directories::SearchDirectorySet;
use super::paths;
use crate::domain::{Callable, DeclaredFunction, DeclaredPlugins, Registry, SecurityPolicy};
use crate::engine::Engine;
use crate::error::{Result, StencilError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "stencil.toml";

/// Environment variable naming a configuration file explicitly
pub const CONFIG_ENV_VAR: &str = "STENCIL_CONFIG";

/// A search directory entry, bare or keyed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DirEntry {
    Path(PathBuf),
    Named { key: String, path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub enabled: bool,
    pub secure_dirs: Vec<PathBuf>,
    pub allowed_modifiers: Vec<String>,
    pub disabled_modifiers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModifierCallbacks {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FunctionConfig {
    #[serde(default = "default_cacheable")]
    pub cacheable: bool,
}

fn default_cacheable() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub template_dirs: Vec<DirEntry>,
    pub config_dirs: Vec<DirEntry>,
    pub security: SecurityConfig,
    /// Legacy plain modifiers: name to call target
    pub modifiers: IndexMap<String, String>,
    pub modifier_callbacks: ModifierCallbacks,
    pub functions: IndexMap<String, FunctionConfig>,

    /// Directory relative entries are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Load a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StencilError::Config(format!("Config file not found: {}", path.display()))
            } else {
                StencilError::Io(e)
            }
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            StencilError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.base_dir = paths::absolute(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(config)
    }

    /// Find the configuration file
    ///
    /// An explicit path wins, then `STENCIL_CONFIG`, then the nearest
    /// `stencil.toml` walking up from the working directory.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Self::load_from_file(&path);
            }
            return Err(StencilError::Config(format!(
                "{} is set to '{}' but no such file exists",
                CONFIG_ENV_VAR,
                path.display()
            )));
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Walk up from `start` looking for `stencil.toml`
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load_from_file(&candidate);
            }
            if !current.pop() {
                return Err(StencilError::Config(format!(
                    "No {} found from {}",
                    CONFIG_FILE_NAME,
                    start.display()
                )));
            }
        }
    }

    fn resolve_dir(&self, dir: &Path) -> PathBuf {
        paths::absolute(&self.base_dir.join(dir))
    }

    fn directory_set(&self, entries: &[DirEntry]) -> SearchDirectorySet {
        let mut set = SearchDirectorySet::new();
        for entry in entries {
            match entry {
                DirEntry::Path(path) => {
                    set.push(self.resolve_dir(path));
                }
                DirEntry::Named { key, path } => {
                    set.insert_named(key, self.resolve_dir(path));
                }
            }
        }
        set
    }

    /// Build the immutable engine described by this configuration
    pub fn into_engine(self) -> Result<Engine> {
        let template_dirs = self.directory_set(&self.template_dirs);
        let config_dirs = self.directory_set(&self.config_dirs);

        let mut registry = Registry::with_builtins();
        for name in &self.modifier_callbacks.names {
            registry.register_modifier_callback(name);
        }
        for (name, function) in &self.functions {
            registry.register_function(
                name,
                Arc::new(DeclaredFunction {
                    cacheable: function.cacheable,
                }),
            );
        }

        let mut plugins = DeclaredPlugins::new();
        for (name, target) in &self.modifiers {
            let callable = Callable::from_str(target).map_err(|e| {
                StencilError::Config(format!("Invalid target for modifier '{}': {}", name, e))
            })?;
            plugins = plugins.modifier(name, callable);
        }
        if !plugins.is_empty() {
            registry.set_default_handler(Arc::new(plugins));
        }

        let mut engine = Engine::new(registry);
        if self.security.enabled {
            let secure_dirs: Vec<PathBuf> = self
                .security
                .secure_dirs
                .iter()
                .map(|dir| self.resolve_dir(dir))
                .collect();
            let allowed: Vec<&str> = self
                .security
                .allowed_modifiers
                .iter()
                .map(String::as_str)
                .collect();
            let disabled: Vec<&str> = self
                .security
                .disabled_modifiers
                .iter()
                .map(String::as_str)
                .collect();

            let policy = SecurityPolicy::new()
                .trust_template_dirs(template_dirs.paths())
                .trust_config_dirs(config_dirs.paths())
                .secure_dirs(secure_dirs)
                .allow_modifiers(&allowed)
                .disable_modifiers(&disabled);
            engine = engine.with_security(Arc::new(policy));
        }

        Ok(engine
            .with_template_dirs(template_dirs)
            .with_config_dirs(config_dirs))
    }
}
