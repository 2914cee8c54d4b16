//! Tag stream compilation use case
//!
//! Runs every tag of one compile unit through the dispatcher and collects the
//! emitted fragments with their cacheability.

use crate::domain::{dispatch, CompilerContext, TagNode};
use crate::engine::Engine;
use crate::error::{CompileError, Result, StencilError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One emitted piece of code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub code: String,
    /// Must run at render time instead of being served from cached output
    pub nocache: bool,
    pub line: Option<u32>,
}

/// Output of one compile unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledTemplate {
    pub fragments: Vec<Fragment>,
    pub has_nocache_code: bool,
    pub has_code: bool,
}

impl CompiledTemplate {
    /// Concatenation of all fragments
    pub fn code(&self) -> String {
        self.fragments.iter().map(|f| f.code.as_str()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct TagStream {
    #[serde(default)]
    tag: Vec<TagNode>,
}

/// Parse a TOML tag stream of `[[tag]]` entries
pub fn parse_stream(contents: &str) -> Result<Vec<TagNode>> {
    let stream: TagStream = toml::from_str(contents)?;
    Ok(stream.tag)
}

/// Read and parse a tag stream file
pub fn load_stream(path: &Path) -> Result<Vec<TagNode>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StencilError::Config(format!("Tag stream not found: {}", path.display()))
        } else {
            StencilError::Io(e)
        }
    })?;
    parse_stream(&contents)
}

/// Service compiling tag streams against one engine
pub struct CompileTemplateService<'a> {
    engine: &'a Engine,
}

impl<'a> CompileTemplateService<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        CompileTemplateService { engine }
    }

    /// Compile one unit
    ///
    /// # Errors
    ///
    /// The first failing tag aborts the unit; no fragment is produced for it.
    /// A stream that leaves a block open fails as well.
    pub fn execute(
        &self,
        template: Option<&str>,
        tags: &[TagNode],
    ) -> std::result::Result<CompiledTemplate, CompileError> {
        let mut ctx = CompilerContext::new(self.engine, template);
        let mut compiled = CompiledTemplate::default();

        for tag in tags {
            ctx.tag_nocache = false;
            let code = dispatch(tag, &mut ctx)?;
            if code.is_empty() {
                continue;
            }

            let nocache = ctx.tag_nocache || ctx.nocache;
            debug!(tag = %tag.name, nocache, "emitted fragment");
            ctx.has_code = true;
            compiled.has_nocache_code |= nocache;
            compiled.fragments.push(Fragment {
                code,
                nocache,
                line: tag.line,
            });
        }

        ctx.finish()?;
        compiled.has_code = ctx.has_code;
        Ok(compiled)
    }
}
