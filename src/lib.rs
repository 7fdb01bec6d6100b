//! Generates assembly metadata source files.
//!
//! Repository facts are read straight from the `.git` directory: no git
//! binary is invoked. All file access goes through [`filesystem::Filesystem`].

pub mod cli;
pub mod config;
pub mod context;
pub mod encoding;
pub mod filesystem;
pub mod host;
pub mod locator;
pub mod options;
pub mod render;
pub mod resolver;

pub use context::RepositoryContext;
pub use filesystem::{Filesystem, MemoryFilesystem, RealFilesystem};
pub use options::GenerationOptions;
pub use render::{RenderEnvironment, render};
pub use resolver::resolve;
