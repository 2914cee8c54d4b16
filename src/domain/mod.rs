//! Domain layer - Tag compilation and source records

pub mod attributes;
pub mod codegen;
pub mod context;
pub mod dispatcher;
pub mod modifier;
pub mod plugins;
pub mod registry;
pub mod scope;
pub mod security;
pub mod source;
pub mod tag;

pub use attributes::AttributeSchema;
pub use context::CompilerContext;
pub use dispatcher::dispatch;
pub use registry::{
    Callable, DeclaredFunction, DeclaredPlugins, FunctionHandler, InlineModifier, Registry,
    TagCompiler,
};
pub use scope::{ScopeFrame, ScopeStack};
pub use security::{SecurityGate, SecurityPolicy};
pub use source::{ResourceKind, SourceRecord, TemplateRef};
pub use tag::{ModifierInvocation, TagNode};
