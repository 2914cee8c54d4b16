//! Modifier chain compilation
//!
//! Each step receives the previous step's expression in argument slot 0.
//! Names resolve through the registry (see [`Registry::resolve_modifier`]):
//! inline compiler, runtime callback, legacy compiler adapter, legacy
//! function or method.
//!
//! [`Registry::resolve_modifier`]: super::registry::Registry::resolve_modifier

use super::codegen::quote;
use super::context::CompilerContext;
use super::registry::{InlineModifier, LegacyModifierCompiler, ModifierHandler};
use super::tag::ModifierInvocation;
use crate::error::{CompileError, CompileErrorKind};
use tracing::{debug, warn};

/// Adapter exposing a legacy modifier compiler as an inline compiler
#[derive(Clone)]
pub struct CompatModifier {
    callback: LegacyModifierCompiler,
}

impl CompatModifier {
    pub fn new(callback: LegacyModifierCompiler) -> Self {
        CompatModifier { callback }
    }
}

impl InlineModifier for CompatModifier {
    fn compile(
        &self,
        args: &[String],
        _ctx: &mut CompilerContext<'_>,
    ) -> Result<String, CompileError> {
        Ok((self.callback)(args))
    }
}

/// Compile `base` through every modifier in order
///
/// A step rejected by the security gate produces nothing and the chain goes
/// on with the previous expression.
pub fn compile_chain(
    ctx: &mut CompilerContext<'_>,
    modifiers: &[ModifierInvocation],
    base: &str,
) -> Result<String, CompileError> {
    ctx.has_code = true;

    let engine = ctx.engine();
    let mut output = base.to_string();

    for invocation in modifiers {
        let mut args = invocation.args.clone();
        match args.first_mut() {
            Some(slot) => *slot = output.clone(),
            None => args.push(output.clone()),
        }
        let name = invocation.name.as_str();

        if let Some(gate) = engine.security() {
            if !gate.is_trusted_modifier(name, ctx) {
                warn!(modifier = name, "modifier not trusted by security policy, step skipped");
                continue;
            }
        }

        let Some(handler) = engine.registry().resolve_modifier(name) else {
            return Err(ctx.trigger_error(CompileErrorKind::UnknownModifier(name.to_string())));
        };

        output = match handler {
            ModifierHandler::Inline(compiler) => compiler.compile(&args, ctx)?,
            ModifierHandler::Adapter(adapter) => adapter.compile(&args, ctx)?,
            ModifierHandler::Callback => format!(
                "$_tpl->getModifierCallback({})({})",
                quote(name),
                args.join(",")
            ),
            ModifierHandler::Callable(target) => target.call(&args.join(",")),
        };
        debug!(modifier = name, expression = %output, "compiled modifier step");
    }

    Ok(output)
}
