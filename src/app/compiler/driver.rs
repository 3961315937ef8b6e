//! Closure builder and compiler driver
//!
//! Every target goes through two steps. `build_deps` asks the closure builder
//! for the ordered list of scripts the target's namespace needs and stores it
//! in `<target>.dep`. `build_target` feeds that list to the compiler and
//! captures everything it prints in `<target>.compiled`, from which the
//! diagnostics summary is parsed.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use super::command::{library_path, path_arg, OutputMode, ToolCommand};
use super::config::{CompileTarget, CompilerConfig};
use super::diagnostics::{BuildSummary, Diagnostics, TargetReport};
use crate::constants::compiler;
use crate::errors::{CompilerError, CompilerResult};

const CLOSURE_BUILDER: &str = "closure/bin/build/closurebuilder.py";
const DEPS_WRITER: &str = "closure/bin/build/depswriter.py";

fn format_skip_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(compiler::FORMAT_SKIP_PATTERN).expect("format skip pattern is valid")
    })
}

/// Drives the closure tooling for the configured targets
#[derive(Debug, Clone)]
pub struct ClosureDriver {
    config: CompilerConfig,
}

impl ClosureDriver {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn targets(&self) -> &[CompileTarget] {
        &self.config.targets
    }

    pub fn target(&self, name: &str) -> CompilerResult<&CompileTarget> {
        self.config.target(name)
    }

    fn working_dir(&self) -> &Path {
        &self.config.working_dir
    }

    /// closurebuilder invocation listing the scripts `target` depends on
    pub fn closure_builder_command(&self, target: &CompileTarget) -> ToolCommand {
        let library = &self.config.closure_library;
        ToolCommand::new(&self.config.python)
            .arg(path_arg(library_path(library, CLOSURE_BUILDER)))
            .arg(format!("--root={}", library.display()))
            .arg("--root=.")
            .arg(format!("--namespace={}", target.namespace))
    }

    /// Compiler invocation for `target` over its dependency list
    pub fn compiler_command(&self, target: &CompileTarget, deps: &[String]) -> ToolCommand {
        let mut command = ToolCommand::new(&self.config.java)
            .arg("-jar")
            .arg(path_arg(&self.config.compiler_jar))
            .args(["--compilation_level", self.config.compilation_level.as_flag()])
            .args(["--warning_level", compiler::WARNING_LEVEL])
            .args(["--jscomp_warning", "undefinedVars"])
            .arg("--externs")
            .arg(path_arg(&self.config.externs));

        for dep in deps {
            command = command.arg("--js").arg(dep.as_str());
        }

        command.arg(format!("--closure_entry_point={}", target.namespace))
    }

    /// depswriter invocation producing the closure dependency file
    pub fn deps_writer_command(&self) -> ToolCommand {
        ToolCommand::new(&self.config.python)
            .arg(path_arg(library_path(&self.config.closure_library, DEPS_WRITER)))
            .arg(format!(
                "--root_with_prefix={}",
                compiler::DEPS_ROOT_WITH_PREFIX
            ))
    }

    /// Style tool invocations for one dependency
    pub fn format_commands(&self, dep: &str) -> [ToolCommand; 2] {
        [
            ToolCommand::new(&self.config.python)
                .arg(compiler::FIXJSSTYLE_SCRIPT)
                .arg(dep),
            ToolCommand::new(&self.config.python)
                .arg(compiler::REFORMAT_SCRIPT)
                .arg("-f")
                .arg(dep),
        ]
    }

    /// Write `<target>.dep`
    pub async fn build_deps(&self, target: &CompileTarget) -> CompilerResult<PathBuf> {
        let command = self.closure_builder_command(target);
        info!("{}", command);

        let output = self.config.in_working_dir(target.dep_filename());
        command
            .run_to_file(self.working_dir(), &output, OutputMode::Truncate, false)
            .await?;
        Ok(output)
    }

    /// Write the dependency list of every target
    pub async fn build_all_deps(&self) -> CompilerResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.config.targets.len());
        for target in &self.config.targets {
            written.push(self.build_deps(target).await?);
        }
        Ok(written)
    }

    /// Read `<target>.dep` into a list of script paths
    pub async fn read_deps(&self, target: &CompileTarget) -> CompilerResult<Vec<String>> {
        let path = self.config.in_working_dir(target.dep_filename());
        let contents = read_output(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CompilerError::MissingDepFile { path: path.clone() }
            } else {
                CompilerError::ReadOutput {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        Ok(parse_dep_list(&contents))
    }

    /// Compile one target and parse its diagnostics
    pub async fn build_target(&self, target: &CompileTarget) -> CompilerResult<TargetReport> {
        let deps = self.read_deps(target).await?;
        let command = self.compiler_command(target, &deps);
        info!("{}", command);

        let output = self.config.in_working_dir(target.compiled_filename());
        command
            .run_to_file(self.working_dir(), &output, OutputMode::Truncate, true)
            .await?;

        let compiled = read_output(&output)
            .await
            .map_err(|source| CompilerError::ReadOutput {
                path: output.clone(),
                source,
            })?;
        let diagnostics = Diagnostics::parse(&compiled);
        if let Some(summary) = &diagnostics.summary {
            info!("{}: {}", target.name, summary);
        }

        Ok(TargetReport {
            target: target.name.clone(),
            diagnostics,
        })
    }

    /// Compile every target, collecting the reports
    pub async fn build_all_targets(&self) -> CompilerResult<BuildSummary> {
        let mut summary = BuildSummary::new();
        for target in &self.config.targets {
            summary.push(self.build_target(target).await?);
        }
        Ok(summary)
    }

    /// Run the style tools over a target's own scripts
    ///
    /// Returns how many scripts were formatted.
    pub async fn format_target(&self, target: &CompileTarget) -> CompilerResult<usize> {
        let deps = self.read_deps(target).await?;
        let mut formatted = 0;

        for dep in deps.iter().filter(|dep| should_format(dep)) {
            for command in self.format_commands(dep) {
                info!("{}", command);
                command.run(self.working_dir()).await?;
            }
            formatted += 1;
        }

        debug!("Formatted {} scripts for {}", formatted, target.name);
        Ok(formatted)
    }

    pub async fn format_all_targets(&self) -> CompilerResult<usize> {
        let mut formatted = 0;
        for target in &self.config.targets {
            formatted += self.format_target(target).await?;
        }
        Ok(formatted)
    }

    /// Regenerate the closure dependency file
    pub async fn build_deps_file(&self) -> CompilerResult<PathBuf> {
        let command = self.deps_writer_command();
        info!("{}", command);

        let output = self.config.in_working_dir(compiler::DEPS_JS_FILE);
        command
            .run_to_file(self.working_dir(), &output, OutputMode::Truncate, false)
            .await?;
        Ok(output)
    }

    /// Dependencies for and build of every target, then the dependency file
    pub async fn build_everything(&self) -> CompilerResult<BuildSummary> {
        self.build_all_deps().await?;
        let summary = self.build_all_targets().await?;
        self.build_deps_file().await?;
        Ok(summary)
    }
}

/// Non-empty, trimmed lines of a dependency list
pub fn parse_dep_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The closure library's base.js is never reformatted
pub fn should_format(dep: &str) -> bool {
    !format_skip_regex().is_match(dep)
}

async fn read_output(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::compiler::config::CompilationLevel;
    use tempfile::TempDir;

    fn driver() -> ClosureDriver {
        ClosureDriver::new(CompilerConfig::default())
    }

    #[test]
    fn test_closure_builder_command() {
        let driver = driver();
        let target = driver.target("matrix").unwrap();
        let command = driver.closure_builder_command(target);

        assert_eq!(command.program, "python3");
        assert_eq!(
            command.args,
            vec![
                path_arg(library_path(Path::new("../closure-library"), CLOSURE_BUILDER)),
                "--root=../closure-library".to_string(),
                "--root=.".to_string(),
                "--namespace=framework.common.tcuMatrix".to_string(),
            ]
        );
    }

    #[test]
    fn test_compiler_command() {
        let driver = driver();
        let target = driver.target("renderer").unwrap();
        let deps = vec!["a.js".to_string(), "b.js".to_string()];
        let command = driver.compiler_command(target, &deps);

        assert_eq!(command.program, "java");
        assert_eq!(
            command.to_string(),
            "java -jar compiler.jar --compilation_level ADVANCED_OPTIMIZATIONS \
             --warning_level VERBOSE --jscomp_warning undefinedVars \
             --externs compiler_additional_extern.js --js a.js --js b.js \
             --closure_entry_point=framework.referencerenderer.rrRenderer"
        );
    }

    #[test]
    fn test_compiler_command_uses_configured_level() {
        let config = CompilerConfig {
            compilation_level: CompilationLevel::SimpleOptimizations,
            ..Default::default()
        };
        let driver = ClosureDriver::new(config);
        let target = driver.target("matrix").unwrap().clone();
        let command = driver.compiler_command(&target, &[]);
        assert!(command.args.contains(&"SIMPLE_OPTIMIZATIONS".to_string()));
    }

    #[test]
    fn test_deps_writer_command() {
        let command = driver().deps_writer_command();
        assert_eq!(
            command.args.last().map(String::as_str),
            Some("--root_with_prefix=. ../../../deqp")
        );
    }

    #[test]
    fn test_parse_dep_list() {
        let deps = parse_dep_list("  a.js\n\nb.js  \n\n");
        assert_eq!(deps, vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_should_format_skips_base_js() {
        assert!(!should_format("../closure-library/closure/goog/base.js"));
        assert!(should_format("functional/gles3/es3fTextureFormatTests.js"));
        assert!(should_format("../closure-library/closure/goog/array/array.js"));
    }

    #[tokio::test]
    async fn test_build_target_without_deps_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = CompilerConfig {
            working_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        let driver = ClosureDriver::new(config);
        let target = driver.target("matrix").unwrap().clone();

        let result = driver.build_target(&target).await;
        assert!(matches!(result, Err(CompilerError::MissingDepFile { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_build_target_parses_captured_output() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("matrix.dep"), "a.js\nb.js\n").unwrap();

        // Stand in for java: a script that ignores its arguments and prints a summary
        let fake_java = temp_dir.path().join("fake-java.sh");
        std::fs::write(
            &fake_java,
            "#!/bin/sh\necho 'a.js:1: WARNING - x' 1>&2\necho '0 error(s), 2 warning(s)'\n",
        )
        .unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&fake_java, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = CompilerConfig {
            working_dir: temp_dir.path().to_path_buf(),
            java: fake_java.display().to_string(),
            ..Default::default()
        };
        let driver = ClosureDriver::new(config);
        let target = driver.target("matrix").unwrap().clone();

        let report = driver.build_target(&target).await.unwrap();
        assert_eq!(report.target, "matrix");
        assert_eq!(report.diagnostics.errors, 0);
        assert_eq!(report.diagnostics.warnings, 2);

        let compiled = std::fs::read_to_string(temp_dir.path().join("matrix.compiled")).unwrap();
        assert!(compiled.contains("WARNING - x"));
    }
}
