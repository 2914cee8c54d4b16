//! `{nocache}` ... `{/nocache}` blocks

use crate::domain::attributes::AttributeSchema;
use crate::domain::context::CompilerContext;
use crate::domain::registry::TagCompiler;
use crate::domain::tag::TagNode;
use crate::error::CompileError;

const NOCACHE: &str = "nocache";

/// Everything up to the matching close runs at render time
#[derive(Debug, Clone, Default)]
pub struct NocacheOpen;

impl TagCompiler for NocacheOpen {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        AttributeSchema::new().resolve(ctx, tag)?;
        ctx.open_tag(NOCACHE);
        ctx.nocache = true;
        Ok(String::new())
    }
}

/// Restores the `nocache` value seen by the matching open tag
#[derive(Debug, Clone, Default)]
pub struct NocacheClose;

impl TagCompiler for NocacheClose {
    fn compile(&self, tag: &TagNode, ctx: &mut CompilerContext<'_>) -> Result<String, CompileError> {
        AttributeSchema::new().resolve(ctx, tag)?;
        let frame = ctx
            .scopes_mut()
            .pop("/nocache", &[NOCACHE])
            .map_err(|e| ctx.locate(e))?;
        ctx.nocache = frame.nocache;
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    #[test]
    fn test_block_sets_and_restores_nocache() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, None);

        NocacheOpen.compile(&TagNode::new("nocache"), &mut ctx).unwrap();
        assert!(ctx.nocache);
        NocacheClose.compile(&TagNode::new("/nocache"), &mut ctx).unwrap();
        assert!(!ctx.nocache);
        assert!(ctx.scopes().is_empty());
    }

    #[test]
    fn test_nested_blocks_keep_outer_state() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, None);

        NocacheOpen.compile(&TagNode::new("nocache"), &mut ctx).unwrap();
        NocacheOpen.compile(&TagNode::new("nocache"), &mut ctx).unwrap();
        NocacheClose.compile(&TagNode::new("/nocache"), &mut ctx).unwrap();
        assert!(ctx.nocache);
        NocacheClose.compile(&TagNode::new("/nocache"), &mut ctx).unwrap();
        assert!(!ctx.nocache);
    }

    #[test]
    fn test_close_across_open_if_fails() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, None);

        NocacheOpen.compile(&TagNode::new("nocache"), &mut ctx).unwrap();
        ctx.open_tag("if");
        assert!(NocacheClose
            .compile(&TagNode::new("/nocache"), &mut ctx)
            .is_err());
        assert_eq!(ctx.scopes().len(), 2);
    }
}
