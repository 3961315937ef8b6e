//! Application constants for the WebGL developer tools
//!
//! Fixed file names, tool flags and defaults, grouped by the tool that uses
//! them.

/// Test page generation
pub mod generator {
    /// Manifest listing every generated page, consumed by the test harness
    pub const MANIFEST_FILE_NAME: &str = "00_test_list.txt";

    /// Extension appended to each group identifier
    pub const DOCUMENT_EXTENSION: &str = ".html";

    /// Suite selected when none is requested
    pub const DEFAULT_SUITE: &str = "texturespecification";
}

/// Closure builder and compiler invocation
pub mod compiler {
    /// Suffix of per-target dependency lists
    pub const DEP_FILE_SUFFIX: &str = ".dep";

    /// Suffix of per-target compiler output
    pub const COMPILED_FILE_SUFFIX: &str = ".compiled";

    /// Generated closure dependency file
    pub const DEPS_JS_FILE: &str = "deqp-deps.js";

    /// Prefix passed to depswriter so paths resolve relative to goog/base.js
    pub const DEPS_ROOT_WITH_PREFIX: &str = ". ../../../deqp";

    /// Default Python interpreter for the closure tooling
    pub const DEFAULT_PYTHON: &str = "python3";

    /// Default Java launcher
    pub const DEFAULT_JAVA: &str = "java";

    /// Default compiler jar
    pub const DEFAULT_COMPILER_JAR: &str = "compiler.jar";

    /// Default closure library checkout, relative to the working directory
    pub const DEFAULT_CLOSURE_LIBRARY: &str = "../closure-library";

    /// Default externs file
    pub const DEFAULT_EXTERNS: &str = "compiler_additional_extern.js";

    /// Style fixer script run by `compile format`
    pub const FIXJSSTYLE_SCRIPT: &str = "fixjsstyle-script.py";

    /// Reformatter script run by `compile format`
    pub const REFORMAT_SCRIPT: &str = "reformatting_tool.py";

    /// Dependencies matching this pattern are never reformatted
    pub const FORMAT_SKIP_PATTERN: &str = r"closure-library.*base\.js";

    /// Compiler diagnostics summary line
    pub const DIAGNOSTICS_PATTERN: &str = r"(\d*)\s*error\(s\),\s*(\d*)\s*warning\(s\)";

    /// Warning level used for every compiler run
    pub const WARNING_LEVEL: &str = "VERBOSE";

    /// Separator between compilation levels in local reports
    pub const REPORT_SEPARATOR: &str = "------------------------------------------";
}

/// Static file server
pub mod server {
    /// Default bind address
    pub const DEFAULT_BIND: &str = "localhost";

    /// Default port
    pub const DEFAULT_PORT: u16 = 8000;

    /// Number of request handling threads
    pub const DEFAULT_THREADS: usize = 4;

    /// Headers attached to every response so browsers never cache test files
    pub const NO_CACHE_HEADERS: [(&str, &str); 3] = [
        ("Cache-Control", "no-cache, no-store, must-revalidate"),
        ("Pragma", "no-cache"),
        ("Expires", "0"),
    ];

    /// File served when a directory is requested
    pub const INDEX_FILE: &str = "index.html";
}

/// IDL extraction
pub mod idl {
    /// Elements holding IDL fragments
    pub const IDL_SELECTOR: &str = "pre.idl";

    /// Separator between extracted fragments
    pub const FRAGMENT_SEPARATOR: &str = "\n\n";
}

/// Configuration file locations
pub mod config {
    /// Project-local config file
    pub const LOCAL_CONFIG_FILE: &str = "webgl-devtools.toml";

    /// Directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "webgl-devtools";

    /// File name under the user config dir
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

/// Logging and debugging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants for convenience
pub use compiler::{COMPILED_FILE_SUFFIX, DEP_FILE_SUFFIX, DEPS_JS_FILE};
pub use generator::{DOCUMENT_EXTENSION, MANIFEST_FILE_NAME};
pub use server::{DEFAULT_BIND, DEFAULT_PORT};
