//! Configuration management for the WebGL developer tools
//!
//! Every setting has a default, so the tools work without a config file. A
//! TOML file can override any subset of them, and command-line flags override
//! the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::compiler::{builtin_targets, CompilationLevel, CompileTarget, CompilerConfig};
use crate::app::generator::{builtin_suites, TestSuite};
use crate::app::server::ServerConfig;
use crate::constants::{compiler, config as paths, generator};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Test page generation settings
    pub generator: GeneratorConfigToml,
    /// Closure tooling settings
    pub compiler: CompilerConfigToml,
    /// Local web server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfigToml {
    /// Where pages are written (current directory when unset)
    pub output_dir: Option<PathBuf>,
    /// Suite used when `generate` is run without `--suite`
    pub default_suite: String,
    /// Extra suites; a suite with a built-in name replaces the built-in one
    pub suites: Vec<TestSuite>,
}

impl Default for GeneratorConfigToml {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_suite: generator::DEFAULT_SUITE.to_string(),
            suites: Vec::new(),
        }
    }
}

impl GeneratorConfigToml {
    /// Built-in suites merged with configured ones, all validated
    pub fn suites(&self) -> crate::errors::GeneratorResult<Vec<TestSuite>> {
        let mut suites = builtin_suites();

        for suite in &self.suites {
            suite.validate()?;
            match suites.iter_mut().find(|existing| existing.name == suite.name) {
                Some(existing) => *existing = suite.clone(),
                None => suites.push(suite.clone()),
            }
        }

        Ok(suites)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// TOML-friendly compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfigToml {
    pub working_dir: PathBuf,
    pub python: String,
    pub java: String,
    pub compiler_jar: PathBuf,
    pub closure_library: PathBuf,
    pub externs: PathBuf,
    pub compilation_level: CompilationLevel,
    /// Replaces the built-in target table when non-empty
    pub targets: Vec<CompileTarget>,
}

impl Default for CompilerConfigToml {
    fn default() -> Self {
        let defaults = CompilerConfig::default();
        Self {
            working_dir: defaults.working_dir,
            python: defaults.python,
            java: defaults.java,
            compiler_jar: defaults.compiler_jar,
            closure_library: defaults.closure_library,
            externs: defaults.externs,
            compilation_level: defaults.compilation_level,
            targets: Vec::new(),
        }
    }
}

impl CompilerConfigToml {
    /// Convert to runtime CompilerConfig
    pub fn to_runtime_config(&self) -> CompilerConfig {
        let targets = if self.targets.is_empty() {
            builtin_targets()
        } else {
            self.targets.clone()
        };

        CompilerConfig {
            working_dir: self.working_dir.clone(),
            python: self.python.clone(),
            java: self.java.clone(),
            compiler_jar: self.compiler_jar.clone(),
            closure_library: self.closure_library.clone(),
            externs: self.externs.clone(),
            compilation_level: self.compilation_level,
            targets,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::constants::logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with precedence:
    /// 1. Explicit config file (must exist)
    /// 2. Project-local `webgl-devtools.toml`
    /// 3. User config directory
    /// 4. Defaults
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        if let Some(path) = config_file_override {
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
            return Self::load_from_file(&path).await;
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Like [`AppConfig::load`], but a config that cannot be loaded yields the
    /// defaults together with the error, so the caller can still run commands
    /// that repair or inspect the file.
    pub async fn load_or_default(
        config_file_override: Option<PathBuf>,
    ) -> (Self, Option<ConfigError>) {
        match Self::load(config_file_override).await {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(paths::LOCAL_CONFIG_FILE)];
        if let Ok(user_config) = Self::get_default_config_path() {
            search_paths.push(user_config);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(paths::CONFIG_DIR_NAME)
            .join(paths::CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write a commented default config file
    pub async fn write_default(path: &Path, force: bool) -> ConfigResult<()> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }

        let to_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(to_error)?;
        }
        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(to_error)?;

        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# WebGL developer tools configuration
# Every setting is optional; remove a line to fall back to its default.

[generator]
# Output directory for generated pages (default: current directory)
# output_dir = "sdk/tests/deqp/functional/gles3/texturespecification"

# Suite generated when --suite is not given
default_suite = "{suite}"

# Additional suites. A suite named like a built-in one replaces it.
# [[generator.suites]]
# name = "texturefiltering"
# title = "WebGL Texture Filtering Tests"
# namespace = "functional.gles3.es3fTextureFilteringTests"
# groups = ["2d_formats", "2d_sizes"]

[compiler]
# Directory the closure tools run in
working_dir = "."
python = "{python}"
java = "{java}"
compiler_jar = "{jar}"
closure_library = "{library}"
externs = "{externs}"
# WHITESPACE_ONLY, SIMPLE_OPTIMIZATIONS or ADVANCED_OPTIMIZATIONS
compilation_level = "ADVANCED_OPTIMIZATIONS"

# Replace the built-in target table
# [[compiler.targets]]
# name = "matrix"
# namespace = "framework.common.tcuMatrix"

[server]
# Use "0.0.0.0" to serve remote clients
bind = "{bind}"
port = {port}
threads = {threads}
# directory = "sdk/tests"

[logging]
level = "{level}"  # error, warn, info, debug, trace
"#,
            suite = generator::DEFAULT_SUITE,
            python = compiler::DEFAULT_PYTHON,
            java = compiler::DEFAULT_JAVA,
            jar = compiler::DEFAULT_COMPILER_JAR,
            library = compiler::DEFAULT_CLOSURE_LIBRARY,
            externs = compiler::DEFAULT_EXTERNS,
            bind = crate::constants::server::DEFAULT_BIND,
            port = crate::constants::server::DEFAULT_PORT,
            threads = crate::constants::server::DEFAULT_THREADS,
            level = crate::constants::logging::DEFAULT_LOG_LEVEL,
        )
    }
}
