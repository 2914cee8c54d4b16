//! Infrastructure layer - Configuration and file system access

pub mod config;
pub mod directories;
pub mod paths;
pub mod resource;

pub use config::Config;
pub use directories::{DirKey, SearchDirectorySet};
pub use resource::FileResource;
