//! Calls of registered functions: `{mailto to=$addr}`

use crate::domain::attributes::{AttributeSchema, ANY_ATTRIBUTE};
use crate::domain::codegen::{params_array, quote};
use crate::domain::context::CompilerContext;
use crate::domain::registry::TagCompiler;
use crate::domain::tag::TagNode;
use crate::error::{CompileError, CompileErrorKind};

/// Compiles a tag naming a registered function handler
#[derive(Debug, Clone)]
pub struct FunctionCallCompiler {
    schema: AttributeSchema,
}

impl Default for FunctionCallCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionCallCompiler {
    pub fn new() -> Self {
        FunctionCallCompiler {
            schema: AttributeSchema::new()
                .optional(&[ANY_ATTRIBUTE])
                .shorttag(&["var1", "var2", "var3"]),
        }
    }

    /// Compile a call of `function` with the tag's attributes
    pub fn compile_call(
        &self,
        tag: &TagNode,
        ctx: &mut CompilerContext<'_>,
        function: &str,
    ) -> Result<String, CompileError> {
        let Some(handler) = ctx.engine().registry().function(function) else {
            return Err(ctx.trigger_error(CompileErrorKind::UnknownFunction(function.to_string())));
        };
        let attrs = self.schema.resolve(ctx, tag)?;

        ctx.tag_nocache = ctx.tag_nocache || !handler.is_cacheable();

        let output = format!(
            "$_tpl->getFunctionHandler({})->handle({}, $_tpl)",
            quote(function),
            params_array(&attrs)
        );

        if tag.modifiers.is_empty() {
            Ok(output)
        } else {
            ctx.compile_modifiers(&tag.modifiers, &output)
        }
    }
}

impl TagCompiler for FunctionCallCompiler {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        self.compile_call(tag, ctx, &tag.name)
    }
}
