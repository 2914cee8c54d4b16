//! Per compile unit state

use super::modifier;
use super::scope::ScopeStack;
use super::tag::ModifierInvocation;
use crate::engine::Engine;
use crate::error::{CompileError, CompileErrorKind};

/// State of one compile unit
///
/// Owns its scope stack; the engine is shared and never mutated.
pub struct CompilerContext<'a> {
    engine: &'a Engine,
    scopes: ScopeStack,
    template: Option<String>,
    line: Option<u32>,

    /// Propagating flag: code emitted in the current scope runs at render time
    pub nocache: bool,
    /// Marks only the fragment of the tag being compiled as render-time
    pub tag_nocache: bool,
    /// Whether any tag produced executable code
    pub has_code: bool,
}

impl<'a> CompilerContext<'a> {
    pub fn new(engine: &'a Engine, template: Option<&str>) -> Self {
        CompilerContext {
            engine,
            scopes: ScopeStack::new(),
            template: template.map(str::to_string),
            line: None,
            nocache: false,
            tag_nocache: false,
            has_code: false,
        }
    }

    pub fn engine(&self) -> &'a Engine {
        self.engine
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn set_line(&mut self, line: Option<u32>) {
        self.line = line;
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }

    /// Open a block, capturing the current `nocache`
    pub fn open_tag(&mut self, family: &str) {
        self.scopes.push(family, self.nocache, self.line);
    }

    /// Close a chain of blocks of the `expected` families
    ///
    /// Returns the number of frames closed and the resulting `nocache`, which
    /// is also stored on the context.
    pub fn close_tag(&mut self, close: &str, expected: &[&str]) -> Result<(usize, bool), CompileError> {
        let (nesting, captured) = self
            .scopes
            .close(close, expected)
            .map_err(|e| self.locate(e))?;
        self.nocache = self.nocache || captured;
        Ok((nesting, self.nocache))
    }

    /// Build a compile error positioned at the tag being compiled
    pub fn trigger_error(&self, kind: CompileErrorKind) -> CompileError {
        self.locate(CompileError::new(kind))
    }

    /// Attach template and line to an error raised elsewhere
    pub fn locate(&self, err: CompileError) -> CompileError {
        err.at(self.template.as_deref(), self.line)
    }

    /// Pipe `base` through a modifier chain
    pub fn compile_modifiers(
        &mut self,
        modifiers: &[ModifierInvocation],
        base: &str,
    ) -> Result<String, CompileError> {
        modifier::compile_chain(self, modifiers, base)
    }

    /// End the compile unit, failing if any block is still open
    pub fn finish(&self) -> Result<(), CompileError> {
        self.scopes.ensure_empty().map_err(|e| {
            let at = e.line;
            e.at(self.template.as_deref(), at)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_captures_current_nocache() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, None);

        ctx.open_tag("if");
        ctx.nocache = true;
        ctx.open_tag("elseif");

        assert!(ctx.scopes().top().unwrap().nocache);
        assert_eq!(ctx.scopes().len(), 2);
    }

    #[test]
    fn test_close_tag_propagates_nocache() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, None);

        ctx.nocache = true;
        ctx.open_tag("if");
        ctx.nocache = false;

        let (nesting, nocache) = ctx.close_tag("/if", &["if"]).unwrap();
        assert_eq!(nesting, 1);
        assert!(nocache);
        assert!(ctx.nocache);
    }

    #[test]
    fn test_close_tag_never_clears_nocache() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, None);

        ctx.open_tag("if");
        ctx.nocache = true;
        let (_, nocache) = ctx.close_tag("/if", &["if"]).unwrap();
        assert!(nocache);
    }

    #[test]
    fn test_errors_carry_position() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, Some("page.tpl"));
        ctx.set_line(Some(8));

        let err = ctx.close_tag("/if", &["if"]).unwrap_err();
        assert_eq!(err.template.as_deref(), Some("page.tpl"));
        assert_eq!(err.line, Some(8));
    }

    #[test]
    fn test_finish_reports_open_block_line() {
        let engine = Engine::default();
        let mut ctx = CompilerContext::new(&engine, Some("page.tpl"));
        ctx.set_line(Some(3));
        ctx.open_tag("if");
        ctx.set_line(Some(10));

        let err = ctx.finish().unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnclosedTag("if".to_string()));
        assert_eq!(err.line, Some(3));
        assert_eq!(err.template.as_deref(), Some("page.tpl"));
    }
}
