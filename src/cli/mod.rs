//! Command-line interface components
//!
//! Argument parsing and the handlers that run each tool.

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompileAction, CompileArgs, CompileLocalArgs, ConfigAction, ConfigArgs,
    ExtractIdlArgs, GenerateArgs, GlobalArgs, ServeArgs,
};
pub use commands::{
    handle_compile, handle_compile_local, handle_config, handle_extract_idl, handle_generate,
    handle_serve,
};
