//! Built-in tag compilers and inline modifiers

pub mod conditional;
pub mod function_call;
pub mod modifiers;
pub mod nocache;
pub mod print;

pub use conditional::{Else, ElseIf, IfClose, IfOpen};
pub use function_call::FunctionCallCompiler;
pub use nocache::{NocacheClose, NocacheOpen};
pub use print::PrintExpression;

use super::registry::Registry;
use std::sync::Arc;

/// Register the built-in tags and inline modifiers
pub fn register_builtins(registry: &mut Registry) {
    registry.register_tag("if", Arc::new(IfOpen::default()));
    registry.register_tag("elseif", Arc::new(ElseIf::default()));
    registry.register_tag("else", Arc::new(Else));
    registry.register_tag("/if", Arc::new(IfClose));
    registry.register_tag("nocache", Arc::new(NocacheOpen));
    registry.register_tag("/nocache", Arc::new(NocacheClose));
    registry.register_tag("print", Arc::new(PrintExpression::default()));

    registry.register_modifier_compiler("cat", Arc::new(modifiers::Cat));
    registry.register_modifier_compiler("default", Arc::new(modifiers::DefaultValue));
}
