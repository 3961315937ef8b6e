//! Closure compiler tooling
//!
//! Wraps the external closure builder and compiler used to type-check the
//! dEQP port. The tools themselves are not bundled; their locations come from
//! [`CompilerConfig`].

pub mod command;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod local;

pub use command::{OutputMode, ToolCommand};
pub use config::{builtin_targets, CompilationLevel, CompileTarget, CompilerConfig};
pub use diagnostics::{BuildSummary, Diagnostics, TargetReport};
pub use driver::ClosureDriver;
pub use local::{compile_directory, LocalCompileOptions, ScriptReport};
