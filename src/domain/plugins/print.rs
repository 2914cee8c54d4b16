//! Output of an expression: `{$title|upper}`

use crate::domain::attributes::AttributeSchema;
use crate::domain::context::CompilerContext;
use crate::domain::registry::TagCompiler;
use crate::domain::tag::TagNode;
use crate::error::CompileError;

#[derive(Debug, Clone)]
pub struct PrintExpression {
    schema: AttributeSchema,
}

impl Default for PrintExpression {
    fn default() -> Self {
        PrintExpression {
            schema: AttributeSchema::new()
                .required(&["value"])
                .shorttag(&["value"]),
        }
    }
}

impl TagCompiler for PrintExpression {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        let attrs = self.schema.resolve(ctx, tag)?;
        let expr = ctx.compile_modifiers(&tag.modifiers, &attrs["value"])?;
        Ok(format!("echo {};", expr))
    }
}
