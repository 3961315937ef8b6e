//! Prelude module for the WebGL developer tools library
//!
//! Re-exports the items most integrations need so that a single
//! `use webgl_devtools::prelude::*;` is enough.
//!
//! # Usage
//!
//! ```rust,no_run
//! use webgl_devtools::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let suite = builtin_suites().remove(0);
//!     let report = TestManifestGenerator::new(suite, "conformance").run()?;
//!     println!("{}", report.manifest_path.display());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Tools
pub use crate::app::{
    builtin_suites, extract_idl_file, render_idl, BuildSummary, ClosureDriver, CompilerConfig,
    GenerationReport, LocalCompileOptions, NoCacheServer, ServerConfig, TestManifestGenerator,
    TestSuite,
};
pub use crate::app::compiler::{CompilationLevel, CompileTarget, Diagnostics};

// Configuration
pub use crate::config::AppConfig;

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _server = ServerConfig::default();
        let _options = LocalCompileOptions::default();
        let compiler = CompilerConfig::default();

        assert_eq!(compiler.targets.len(), 21);
        assert!(!builtin_suites().is_empty());
        assert_eq!(CompilationLevel::ALL.len(), 3);
    }

    #[test]
    fn test_generate_through_prelude() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let suite = builtin_suites().remove(0);

        let report = TestManifestGenerator::new(suite, temp_dir.path())
            .run()
            .unwrap();

        assert_eq!(report.document_count(), 26);
        assert!(report.manifest_path.exists());
    }
}
