//! stencil - Template tag compiler and resource resolver
//!
//! Compiles streams of parsed template tags into code fragments while
//! tracking block nesting and render-time (nocache) requirements, and
//! resolves template and config identifiers against search directories.

pub mod application;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod infrastructure;

pub use engine::Engine;
pub use error::StencilError;
