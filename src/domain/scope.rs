//! Nesting of block tags within one compile unit

use crate::error::{CompileError, CompileErrorKind};

/// An open block tag
///
/// Frames are owned by the stack and never cloned.
#[derive(Debug, PartialEq, Eq)]
pub struct ScopeFrame {
    pub family: String,
    /// `nocache` value at the time the opening tag was compiled
    pub nocache: bool,
    pub line: Option<u32>,
}

/// Stack of open block tags
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, family: &str, nocache: bool, line: Option<u32>) {
        self.frames.push(ScopeFrame {
            family: family.to_string(),
            nocache,
            line,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    /// Close a chain of frames belonging to `expected` families
    ///
    /// Pops while the top frame's family is expected and returns how many
    /// frames were popped together with the OR of their captured `nocache`.
    /// `tag` names the closing tag for error reporting.
    pub fn close(&mut self, tag: &str, expected: &[&str]) -> Result<(usize, bool), CompileError> {
        self.check_top(tag, expected)?;

        let mut nesting = 0;
        let mut nocache = false;
        while let Some(frame) = self.frames.last() {
            if !expected.contains(&frame.family.as_str()) {
                break;
            }
            if let Some(frame) = self.frames.pop() {
                nocache |= frame.nocache;
                nesting += 1;
            }
        }
        Ok((nesting, nocache))
    }

    /// Pop exactly one frame of an expected family
    pub fn pop(&mut self, tag: &str, expected: &[&str]) -> Result<ScopeFrame, CompileError> {
        self.check_top(tag, expected)?;
        self.frames.pop().ok_or_else(|| Self::unbalanced(tag, None))
    }

    /// Swap the top frame for a new family, keeping its captured `nocache`
    /// OR-ed with `nocache`
    pub fn replace_top(
        &mut self,
        tag: &str,
        expected: &[&str],
        family: &str,
        nocache: bool,
        line: Option<u32>,
    ) -> Result<(), CompileError> {
        let frame = self.pop(tag, expected)?;
        self.push(family, frame.nocache || nocache, line);
        Ok(())
    }

    /// Fail if any frame is still open at the end of a compile unit
    pub fn ensure_empty(&self) -> Result<(), CompileError> {
        match self.frames.last() {
            None => Ok(()),
            Some(frame) => Err(CompileError::new(CompileErrorKind::UnclosedTag(
                frame.family.clone(),
            ))
            .at(None, frame.line)),
        }
    }

    /// Fail unless the innermost open block is one of `expected`
    pub fn check_top(&self, tag: &str, expected: &[&str]) -> Result<(), CompileError> {
        match self.frames.last() {
            Some(frame) if expected.contains(&frame.family.as_str()) => Ok(()),
            Some(frame) => Err(Self::unbalanced(tag, Some(&frame.family))),
            None => Err(Self::unbalanced(tag, None)),
        }
    }

    fn unbalanced(tag: &str, open: Option<&str>) -> CompileError {
        CompileError::new(CompileErrorKind::Unbalanced {
            tag: tag.to_string(),
            open: open.map(str::to_string),
        })
    }
}
