//! Command-line argument parsing for the WebGL developer tools
//!
//! This module defines the CLI structure using clap derive macros. Each
//! subcommand maps onto one tool in [`crate::app`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::compiler::CompilationLevel;

/// WebGL conformance suite developer tools
#[derive(Parser, Debug)]
#[command(
    name = "webgl_devtools",
    version,
    about = "Developer tooling for the WebGL conformance suite",
    long_about = "Generates conformance test pages, drives the closure compiler over the dEQP port,
extracts IDL from the HTML specifications and serves the suite locally with caching disabled."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate test pages and their manifest for a suite
    Generate(GenerateArgs),

    /// Build dependency lists and compile targets with the closure compiler
    Compile(CompileArgs),

    /// Compile every script in a directory and write per-script reports
    CompileLocal(CompileLocalArgs),

    /// Serve a directory over HTTP with caching disabled
    Serve(ServeArgs),

    /// Extract the IDL blocks from an HTML specification
    ExtractIdl(ExtractIdlArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the generate command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Suite to generate (defaults to the configured default suite)
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Directory to write pages into
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// List configured suites instead of generating
    #[arg(long)]
    pub list: bool,
}

/// Arguments for the compile command
#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    /// Directory the closure tools run in
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Without an action: rebuild all dependencies, build all targets and
    /// regenerate the dependency file
    #[command(subcommand)]
    pub action: Option<CompileAction>,
}

/// Closure compiler actions
#[derive(Subcommand, Debug, Clone)]
pub enum CompileAction {
    /// Rebuild dependency lists
    Deps {
        /// Only this target
        target: Option<String>,
    },

    /// Run the style tools over target sources
    Format {
        /// Only this target
        target: Option<String>,
    },

    /// Compile targets from existing dependency lists
    Build {
        /// Only this target
        target: Option<String>,
    },

    /// Regenerate the closure dependency file
    Depfile,

    /// Rebuild dependencies for and compile a single target
    Target {
        /// Target name
        name: String,
    },

    /// List the configured targets
    List,
}

/// Arguments for the compile-local command
#[derive(Args, Debug, Clone)]
pub struct CompileLocalArgs {
    /// Directory to scan for scripts (defaults to the current directory)
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Skip the WHITESPACE_ONLY pass
    #[arg(long)]
    pub no_whitespace: bool,

    /// Skip the SIMPLE_OPTIMIZATIONS pass
    #[arg(long)]
    pub no_simple: bool,

    /// Skip the ADVANCED_OPTIMIZATIONS pass
    #[arg(long)]
    pub no_advanced: bool,
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(value_name = "PORT")]
    pub port: Option<u16>,

    /// Address to bind; pass 0.0.0.0 to serve remote clients
    #[arg(short, long, value_name = "ADDRESS")]
    pub bind: Option<String>,

    /// Directory to serve (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Request handling threads
    #[arg(long)]
    pub threads: Option<usize>,
}

/// Arguments for the extract-idl command
#[derive(Args, Debug, Clone)]
pub struct ExtractIdlArgs {
    /// HTML specification to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the IDL here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Copyright year for the license header (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Where to write it (defaults to the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl CompileLocalArgs {
    /// Levels left after the --no-* flags
    pub fn levels(&self) -> Vec<CompilationLevel> {
        CompilationLevel::ALL
            .into_iter()
            .filter(|level| match level {
                CompilationLevel::WhitespaceOnly => !self.no_whitespace,
                CompilationLevel::SimpleOptimizations => !self.no_simple,
                CompilationLevel::AdvancedOptimizations => !self.no_advanced,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "webgl_devtools",
            "generate",
            "--suite",
            "texturespecification",
            "-o",
            "out",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.suite.as_deref(), Some("texturespecification"));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert!(!args.list);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_compile_actions() {
        let cli = Cli::try_parse_from(["webgl_devtools", "compile"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Compile(CompileArgs { action: None, .. })
        ));

        let cli = Cli::try_parse_from(["webgl_devtools", "compile", "build", "matrix"]).unwrap();
        match cli.command {
            Commands::Compile(CompileArgs {
                action: Some(CompileAction::Build { target }),
                ..
            }) => assert_eq!(target.as_deref(), Some("matrix")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["webgl_devtools", "serve", "8080", "-b", "0.0.0.0"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.bind.as_deref(), Some("0.0.0.0"));
                assert!(args.directory.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_compile_local_levels() {
        let args = CompileLocalArgs {
            directory: None,
            no_whitespace: false,
            no_simple: true,
            no_advanced: false,
        };
        assert_eq!(
            args.levels(),
            vec![
                CompilationLevel::WhitespaceOnly,
                CompilationLevel::AdvancedOptimizations
            ]
        );
    }

    #[test]
    fn test_log_level() {
        let quiet = Cli::try_parse_from(["webgl_devtools", "-q", "config", "show"]).unwrap();
        let verbose = Cli::try_parse_from(["webgl_devtools", "config", "show", "-v"]).unwrap();
        let default = Cli::try_parse_from(["webgl_devtools", "config", "show"]).unwrap();

        assert_eq!(quiet.log_level(), Some(tracing::Level::ERROR));
        assert_eq!(verbose.log_level(), Some(tracing::Level::INFO));
        assert_eq!(default.log_level(), None);
    }
}
