//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(about = "Template tag compiler and resource resolver", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: STENCIL_CONFIG, then the nearest stencil.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a template or config identifier to its source file
    Resolve {
        /// Identifier, optionally prefixed with a resource kind (e.g., file:index.tpl, [admin]menu.tpl)
        name: String,

        /// Resolve against the config directories instead of the template directories
        #[arg(long)]
        config: bool,

        /// File of the including template, for ./ and ../ identifiers
        #[arg(long, value_name = "FILE")]
        parent: Option<PathBuf>,
    },

    /// Compile a TOML tag stream into code fragments
    Compile {
        /// Tag stream file with [[tag]] entries
        stream: PathBuf,

        /// Template name reported in error messages
        #[arg(short, long)]
        template: Option<String>,
    },

    /// List the templates reachable through the template directories
    List,
}
