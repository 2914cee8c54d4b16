//! Routing of tags to their compilers

use super::context::CompilerContext;
use super::plugins::FunctionCallCompiler;
use super::registry::TagCompiler;
use super::tag::TagNode;
use crate::error::CompileError;
use tracing::debug;

/// Compile one tag
///
/// Tag compilers are looked up by exact name; any other name compiles as a
/// call of the function handler registered under it.
pub fn dispatch(tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
    ctx.set_line(tag.line);
    let registry = ctx.engine().registry();

    let result = if let Some(compiler) = registry.tag(&tag.name) {
        debug!(tag = %tag.name, line = ?tag.line, "dispatching to tag compiler");
        compiler.compile(tag, ctx)
    } else {
        debug!(tag = %tag.name, line = ?tag.line, "dispatching to function call");
        FunctionCallCompiler::new().compile(tag, ctx)
    };

    result.map_err(|e| ctx.locate(e).in_tag(&tag.name))
}
