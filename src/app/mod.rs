//! Application core for the WebGL developer tools
//!
//! Each submodule is one tool; the CLI layer in [`crate::cli`] only parses
//! arguments and calls into these.

pub mod compiler;
pub mod generator;
pub mod idl;
pub mod server;

// Re-export the main entry point of each tool
pub use compiler::{BuildSummary, ClosureDriver, CompilerConfig, LocalCompileOptions};
pub use generator::{builtin_suites, GenerationReport, TestManifestGenerator, TestSuite};
pub use idl::{extract_idl_file, render_idl};
pub use server::{NoCacheServer, ServerConfig};
