//! Template and config resolution use case

use crate::domain::{SourceRecord, TemplateRef};
use crate::engine::Engine;
use crate::error::Result;
use crate::infrastructure::FileResource;
use std::path::Path;

/// Service resolving resource identifiers against one engine
pub struct ResolveSourceService<'a> {
    engine: &'a Engine,
}

impl<'a> ResolveSourceService<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        ResolveSourceService { engine }
    }

    /// Resolve `resource` (`kind:name` or a bare name)
    ///
    /// When `parent` names an existing file, the request is made on behalf of
    /// a sub-template included from it, so `./` and `../` names resolve
    /// relative to that file.
    pub fn execute(
        &self,
        resource: &str,
        is_config: bool,
        parent: Option<&Path>,
    ) -> Result<SourceRecord> {
        let resolver = FileResource::new(self.engine);
        let mut source = SourceRecord::parse(resource, is_config);

        match parent {
            Some(parent_path) => {
                let mut parent_source = SourceRecord::parse(&parent_path.to_string_lossy(), false);
                resolver.populate(&mut parent_source, None)?;
                let template = TemplateRef::sub(&parent_source);
                resolver.populate(&mut source, Some(&template))?;
            }
            None => resolver.populate(&mut source, None)?,
        }

        Ok(source)
    }
}
