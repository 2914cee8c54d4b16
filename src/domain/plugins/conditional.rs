//! `{if}`, `{elseif}`, `{else}` and `{/if}`
//!
//! `{elseif}` opens a nested `if` inside the previous branch's `else`, so the
//! scope stack holds one frame per open brace and a single `{/if}` closes the
//! whole chain.

use crate::domain::attributes::AttributeSchema;
use crate::domain::context::CompilerContext;
use crate::domain::registry::TagCompiler;
use crate::domain::tag::TagNode;
use crate::error::CompileError;

const IF: &str = "if";
const ELSEIF: &str = "elseif";
const ELSE: &str = "else";

fn condition_schema() -> AttributeSchema {
    AttributeSchema::new()
        .required(&["condition"])
        .shorttag(&["condition"])
}

#[derive(Debug, Clone)]
pub struct IfOpen {
    schema: AttributeSchema,
}

impl Default for IfOpen {
    fn default() -> Self {
        IfOpen {
            schema: condition_schema(),
        }
    }
}

impl TagCompiler for IfOpen {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        let attrs = self.schema.resolve(ctx, tag)?;
        ctx.open_tag(IF);
        Ok(format!("if ({}) {{", attrs["condition"]))
    }
}

#[derive(Debug, Clone)]
pub struct ElseIf {
    schema: AttributeSchema,
}

impl Default for ElseIf {
    fn default() -> Self {
        ElseIf {
            schema: condition_schema(),
        }
    }
}

impl TagCompiler for ElseIf {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        let attrs = self.schema.resolve(ctx, tag)?;
        ctx.scopes()
            .check_top(ELSEIF, &[IF, ELSEIF])
            .map_err(|e| ctx.locate(e))?;
        ctx.open_tag(ELSEIF);
        Ok(format!("}} else {{ if ({}) {{", attrs["condition"]))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Else;

impl TagCompiler for Else {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        AttributeSchema::new().resolve(ctx, tag)?;
        let (nocache, line) = (ctx.nocache, ctx.line());
        ctx.scopes_mut()
            .replace_top(ELSE, &[IF, ELSEIF], ELSE, nocache, line)
            .map_err(|e| ctx.locate(e))?;
        Ok("} else {".to_string())
    }
}

/// Closes every frame of an if/elseif/else chain
#[derive(Debug, Clone, Default)]
pub struct IfClose;

impl TagCompiler for IfClose {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        AttributeSchema::new().resolve(ctx, tag)?;

        // a nocache conditional makes its closing fragment nocache too
        if ctx.nocache {
            ctx.tag_nocache = true;
        }
        let (nesting, nocache) = ctx.close_tag("/if", &[IF, ELSEIF, ELSE])?;
        ctx.tag_nocache = ctx.tag_nocache || nocache;

        Ok("}".repeat(nesting))
    }
}
