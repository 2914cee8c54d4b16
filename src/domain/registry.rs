//! Name-keyed plugin registry
//!
//! Populated once while the engine is configured and read-only afterwards.

use super::context::CompilerContext;
use super::modifier::CompatModifier;
use super::tag::TagNode;
use crate::error::CompileError;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Compiles one tag into a code fragment
pub trait TagCompiler: Send + Sync {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError>;
}

/// Compiles a modifier step directly into an expression
///
/// `args[0]` holds the piped value.
pub trait InlineModifier: Send + Sync {
    fn compile(&self, args: &[String], ctx: &mut CompilerContext<'_>)
        -> Result<String, CompileError>;
}

/// A function callable from templates as `{name ...}`
pub trait FunctionHandler: Send + Sync {
    /// Whether the function's output may be served from a rendered-output cache
    fn is_cacheable(&self) -> bool {
        true
    }
}

/// Function declared only by name and cacheability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredFunction {
    pub cacheable: bool,
}

impl FunctionHandler for DeclaredFunction {
    fn is_cacheable(&self) -> bool {
        self.cacheable
    }
}

/// Plugin categories a default handler can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Modifier,
    ModifierCompiler,
}

/// Render-time call target of a legacy plain modifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callable {
    /// `name(args)`
    Function(String),
    /// `$object->method(args)`
    Method { object: String, method: String },
    /// `Class::method(args)`
    Static { class: String, method: String },
}

impl Callable {
    /// Emit a call of this target with already compiled parameters
    pub fn call(&self, params: &str) -> String {
        match self {
            Callable::Function(name) => format!("{}({})", name, params),
            Callable::Method { object, method } => format!("{}->{}({})", object, method, params),
            Callable::Static { class, method } => format!("{}::{}({})", class, method, params),
        }
    }
}

impl FromStr for Callable {
    type Err = String;

    /// Parse `fn`, `Class::method` or `$object->method`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '\\')
        };

        if let Some((object, method)) = s.split_once("->") {
            let name = object.strip_prefix('$').unwrap_or_default();
            if valid(name) && valid(method) {
                return Ok(Callable::Method {
                    object: object.to_string(),
                    method: method.to_string(),
                });
            }
        } else if let Some((class, method)) = s.split_once("::") {
            if valid(class) && valid(method) {
                return Ok(Callable::Static {
                    class: class.to_string(),
                    method: method.to_string(),
                });
            }
        } else if valid(s) {
            return Ok(Callable::Function(s.to_string()));
        }

        Err(format!("Invalid callable: '{}'", s))
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Function(name) => f.write_str(name),
            Callable::Method { object, method } => write!(f, "{}->{}", object, method),
            Callable::Static { class, method } => write!(f, "{}::{}", class, method),
        }
    }
}

/// Legacy modifier compiler: receives the argument list, returns an expression
pub type LegacyModifierCompiler = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// What a default handler can supply
#[derive(Clone)]
pub enum DefaultPlugin {
    ModifierCompiler(LegacyModifierCompiler),
    Callable(Callable),
}

impl fmt::Debug for DefaultPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultPlugin::ModifierCompiler(_) => f.write_str("ModifierCompiler(..)"),
            DefaultPlugin::Callable(c) => f.debug_tuple("Callable").field(c).finish(),
        }
    }
}

/// Last-resort lookup for plugins that were not registered explicitly
pub trait DefaultPluginHandler: Send + Sync {
    fn resolve(&self, name: &str, kind: PluginKind) -> Option<DefaultPlugin>;
}

/// Default handler backed by static tables
#[derive(Default, Clone)]
pub struct DeclaredPlugins {
    entries: HashMap<(PluginKind, String), DefaultPlugin>,
}

impl DeclaredPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifier(mut self, name: &str, target: Callable) -> Self {
        self.entries.insert(
            (PluginKind::Modifier, name.to_string()),
            DefaultPlugin::Callable(target),
        );
        self
    }

    pub fn modifier_compiler(mut self, name: &str, compiler: LegacyModifierCompiler) -> Self {
        self.entries.insert(
            (PluginKind::ModifierCompiler, name.to_string()),
            DefaultPlugin::ModifierCompiler(compiler),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DefaultPluginHandler for DeclaredPlugins {
    fn resolve(&self, name: &str, kind: PluginKind) -> Option<DefaultPlugin> {
        self.entries.get(&(kind, name.to_string())).cloned()
    }
}

/// How a modifier name was resolved, in priority order
#[derive(Clone)]
pub enum ModifierHandler {
    /// Registered inline compiler
    Inline(Arc<dyn InlineModifier>),
    /// Registered runtime callback, invoked by name at render time
    Callback,
    /// Legacy compiler plugin behind the compatibility adapter
    Adapter(CompatModifier),
    /// Legacy plain function or method
    Callable(Callable),
}

impl fmt::Debug for ModifierHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierHandler::Inline(_) => f.write_str("Inline(..)"),
            ModifierHandler::Callback => f.write_str("Callback"),
            ModifierHandler::Adapter(_) => f.write_str("Adapter(..)"),
            ModifierHandler::Callable(c) => f.debug_tuple("Callable").field(c).finish(),
        }
    }
}

/// Registry of tag compilers, modifiers and functions
#[derive(Default)]
pub struct Registry {
    tags: HashMap<String, Arc<dyn TagCompiler>>,
    modifier_compilers: HashMap<String, Arc<dyn InlineModifier>>,
    modifier_callbacks: HashSet<String>,
    functions: HashMap<String, Arc<dyn FunctionHandler>>,
    default_handler: Option<Arc<dyn DefaultPluginHandler>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in tags and inline modifiers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::plugins::register_builtins(&mut registry);
        registry
    }

    pub fn register_tag(&mut self, name: &str, compiler: Arc<dyn TagCompiler>) {
        self.tags.insert(name.to_string(), compiler);
    }

    pub fn register_modifier_compiler(&mut self, name: &str, compiler: Arc<dyn InlineModifier>) {
        self.modifier_compilers.insert(name.to_string(), compiler);
    }

    pub fn register_modifier_callback(&mut self, name: &str) {
        self.modifier_callbacks.insert(name.to_string());
    }

    pub fn register_function(&mut self, name: &str, handler: Arc<dyn FunctionHandler>) {
        self.functions.insert(name.to_string(), handler);
    }

    pub fn set_default_handler(&mut self, handler: Arc<dyn DefaultPluginHandler>) {
        self.default_handler = Some(handler);
    }

    pub fn tag(&self, name: &str) -> Option<Arc<dyn TagCompiler>> {
        self.tags.get(name).cloned()
    }

    pub fn function(&self, name: &str) -> Option<Arc<dyn FunctionHandler>> {
        self.functions.get(name).cloned()
    }

    pub fn has_modifier_callback(&self, name: &str) -> bool {
        self.modifier_callbacks.contains(name)
    }

    pub fn default_plugin(&self, name: &str, kind: PluginKind) -> Option<DefaultPlugin> {
        self.default_handler
            .as_ref()
            .and_then(|handler| handler.resolve(name, kind))
    }

    /// Resolve a modifier name; the first matching strategy wins
    pub fn resolve_modifier(&self, name: &str) -> Option<ModifierHandler> {
        let handler = if let Some(compiler) = self.modifier_compilers.get(name) {
            ModifierHandler::Inline(Arc::clone(compiler))
        } else if self.has_modifier_callback(name) {
            ModifierHandler::Callback
        } else if let Some(DefaultPlugin::ModifierCompiler(callback)) =
            self.default_plugin(name, PluginKind::ModifierCompiler)
        {
            ModifierHandler::Adapter(CompatModifier::new(callback))
        } else if let Some(DefaultPlugin::Callable(target)) =
            self.default_plugin(name, PluginKind::Modifier)
        {
            ModifierHandler::Callable(target)
        } else {
            return None;
        };

        debug!(modifier = name, strategy = ?handler, "resolved modifier");
        Some(handler)
    }
}
