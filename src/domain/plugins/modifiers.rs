//! Built-in inline modifier compilers

use crate::domain::context::CompilerContext;
use crate::domain::registry::InlineModifier;
use crate::error::{CompileError, CompileErrorKind};

/// `cat`: concatenate the value with every argument
#[derive(Debug, Clone, Default)]
pub struct Cat;

impl InlineModifier for Cat {
    fn compile(&self, args: &[String], _ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        Ok(format!("({})", args.join(" . ")))
    }
}

/// `default`: substitute a fallback for a null value
#[derive(Debug, Clone, Default)]
pub struct DefaultValue;

impl InlineModifier for DefaultValue {
    fn compile(&self, args: &[String], ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        match args {
            [value] => Ok(format!("({} ?? '')", value)),
            [value, fallback] => Ok(format!("({} ?? {})", value, fallback)),
            _ => Err(ctx.trigger_error(CompileErrorKind::Invalid(
                "modifier 'default' takes at most one argument".to_string(),
            ))),
        }
    }
}
