//! Application layer - Use cases and orchestration

pub mod compile_template;
pub mod list_templates;
pub mod resolve_source;

pub use compile_template::{CompileTemplateService, CompiledTemplate, Fragment};
pub use list_templates::{list_templates, TemplateEntry};
pub use resolve_source::ResolveSourceService;
