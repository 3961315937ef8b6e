//! Error types for the WebGL developer tools
//!
//! Each tool gets its own error enum so that failures carry the context a
//! developer needs to act on them (which file, which target, which command).
//! `AppError` ties them together for the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Test page generation errors
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Writing a generated document or the manifest failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two groups in a suite produce the same output filename
    #[error("Duplicate test group '{group}' in suite '{suite}'")]
    DuplicateGroup { suite: String, group: String },

    /// Group identifier cannot be used as a filename stem
    #[error("Invalid test group '{group}' in suite '{suite}': {reason}")]
    InvalidGroup {
        suite: String,
        group: String,
        reason: String,
    },

    /// Requested suite is not configured
    #[error("Unknown test suite '{name}'. Run 'generate --list' to see the configured suites")]
    UnknownSuite { name: String },
}

/// Closure compiler driver errors
#[derive(Error, Debug)]
pub enum CompilerError {
    /// Target name not present in the target table
    #[error("Unknown compile target '{name}'")]
    UnknownTarget { name: String },

    /// Dependency list for a target has not been built yet
    #[error("Dependency file not found: {path}. Run 'compile deps' first")]
    MissingDepFile { path: PathBuf },

    /// Captured tool output could not be read back
    #[error("Failed to read compiler output {path}: {source}")]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External tool could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Some targets finished with diagnostics; the report has the totals
    #[error("{failed} of {total} target(s) did not compile cleanly")]
    CompilationFailed { failed: usize, total: usize },

    /// Directory walk failed while collecting scripts
    #[error("Failed to scan {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    /// I/O error reading or writing tool output
    #[error("Compiler output I/O error")]
    Io(#[from] std::io::Error),
}

/// Static file server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Listening socket could not be bound
    #[error("Failed to bind {address}: {reason}")]
    Bind { address: String, reason: String },

    /// Served directory does not exist
    #[error("Directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// I/O error while serving
    #[error("Server I/O error")]
    Io(#[from] std::io::Error),
}

/// IDL extraction errors
#[derive(Error, Debug)]
pub enum IdlError {
    /// Input HTML document could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSS selector error
    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },

    /// Output file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered back to TOML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Config file already exists and force flag not set
    #[error("Configuration file already exists: {path}. Use --force to overwrite")]
    AlreadyExists { path: PathBuf },

    /// No user configuration directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// I/O error reading or writing configuration
    #[error("Configuration I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Generator error
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Compiler driver error
    #[error(transparent)]
    Compiler(#[from] CompilerError),

    /// Server error
    #[error(transparent)]
    Server(#[from] ServerError),

    /// IDL extraction error
    #[error(transparent)]
    Idl(#[from] IdlError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Generator(_) => "generator",
            AppError::Compiler(_) => "compiler",
            AppError::Server(_) => "server",
            AppError::Idl(_) => "idl",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Generator result type alias
pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;

/// Compiler result type alias
pub type CompilerResult<T> = std::result::Result<T, CompilerError>;

/// Server result type alias
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// IDL result type alias
pub type IdlResult<T> = std::result::Result<T, IdlError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
