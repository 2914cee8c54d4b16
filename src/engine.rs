//! Engine-wide configuration shared by every compile unit

use crate::domain::{Registry, SecurityGate};
use crate::infrastructure::SearchDirectorySet;
use std::sync::Arc;

/// Immutable engine configuration
///
/// Built once, then shared by reference; compile units and resolvers only
/// ever read from it.
pub struct Engine {
    registry: Registry,
    security: Option<Arc<dyn SecurityGate>>,
    template_dirs: SearchDirectorySet,
    config_dirs: SearchDirectorySet,
}

impl Engine {
    pub fn new(registry: Registry) -> Self {
        Engine {
            registry,
            security: None,
            template_dirs: SearchDirectorySet::new(),
            config_dirs: SearchDirectorySet::new(),
        }
    }

    pub fn with_template_dirs(mut self, dirs: SearchDirectorySet) -> Self {
        self.template_dirs = dirs;
        self
    }

    pub fn with_config_dirs(mut self, dirs: SearchDirectorySet) -> Self {
        self.config_dirs = dirs;
        self
    }

    pub fn with_security(mut self, gate: Arc<dyn SecurityGate>) -> Self {
        self.security = Some(gate);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn security(&self) -> Option<&dyn SecurityGate> {
        self.security.as_deref()
    }

    pub fn template_dirs(&self) -> &SearchDirectorySet {
        &self.template_dirs
    }

    pub fn config_dirs(&self) -> &SearchDirectorySet {
        &self.config_dirs
    }

    /// Directory set searched for the given resource class
    pub fn dirs_for(&self, is_config: bool) -> &SearchDirectorySet {
        if is_config {
            &self.config_dirs
        } else {
            &self.template_dirs
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Registry::with_builtins())
    }
}
