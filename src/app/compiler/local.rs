//! Per-script compile reports
//!
//! Compiles every script under a directory on its own at each requested
//! optimization level and keeps the compiler's full output in a text report
//! beside the script. No compiled JavaScript is written, so repeated runs never
//! pick up their own output.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::command::{open_output, path_arg, OutputMode, ToolCommand};
use super::config::{CompilationLevel, CompilerConfig};
use crate::constants::compiler;
use crate::errors::{CompilerError, CompilerResult};

/// Which levels to compile each script at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCompileOptions {
    pub levels: Vec<CompilationLevel>,
}

impl Default for LocalCompileOptions {
    fn default() -> Self {
        Self {
            levels: CompilationLevel::ALL.to_vec(),
        }
    }
}

/// Report written for one script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    pub script: PathBuf,
    pub report: PathBuf,
}

/// All `.js` files below `root`, sorted by path
pub fn collect_scripts(root: &Path) -> CompilerResult<Vec<PathBuf>> {
    let mut scripts = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| CompilerError::Walk {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some("js")
        {
            scripts.push(entry.into_path());
        }
    }

    Ok(scripts)
}

/// Report path for a script: same directory, `.txt` instead of `.js`
pub fn report_path(script: &Path) -> PathBuf {
    script.with_extension("txt")
}

/// Compiler invocation for a single script at one level
pub fn script_command(config: &CompilerConfig, script: &Path, level: CompilationLevel) -> ToolCommand {
    ToolCommand::new(&config.java)
        .arg("-jar")
        .arg(path_arg(&config.compiler_jar))
        .args(["--compilation_level", level.as_flag()])
        .arg("--js")
        .arg(path_arg(script))
        .args(["--warning_level", compiler::WARNING_LEVEL])
}

/// Compile one script at every requested level and write its report
pub async fn compile_script(
    config: &CompilerConfig,
    script: &Path,
    options: &LocalCompileOptions,
) -> CompilerResult<ScriptReport> {
    info!("Running closure compiler for {}", script.display());

    let report = report_path(script);
    // Tools run in the configured working directory, not necessarily ours
    let script_arg = std::fs::canonicalize(script)?;
    let file_name = |path: &Path| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    write_section(
        &report,
        OutputMode::Truncate,
        &format!(
            "CLOSURE COMPILER OUTPUT \nJavaScript shader file: {}\nOutput file from CLOSURE COMPILER: {}\n",
            file_name(script),
            file_name(&report)
        ),
    )?;

    for level in &options.levels {
        write_section(
            &report,
            OutputMode::Append,
            &format!(
                "{}{}\nCOMPILATION LEVEL: {}\n",
                section_lead(*level),
                compiler::REPORT_SEPARATOR,
                level
            ),
        )?;

        let command = script_command(config, &script_arg, *level);
        debug!("{}", command);
        command
            .run_to_file(&config.working_dir, &report, OutputMode::Append, true)
            .await?;
    }

    info!("Output saved in {}", report.display());
    Ok(ScriptReport {
        script: script.to_path_buf(),
        report,
    })
}

/// Compile every script under `root`
pub async fn compile_directory(
    config: &CompilerConfig,
    root: &Path,
    options: &LocalCompileOptions,
) -> CompilerResult<Vec<ScriptReport>> {
    let scripts = collect_scripts(root)?;
    let mut reports = Vec::with_capacity(scripts.len());
    for script in &scripts {
        reports.push(compile_script(config, script, options).await?);
    }
    Ok(reports)
}

/// Blank lines before a level's section; the first level follows the header directly
fn section_lead(level: CompilationLevel) -> &'static str {
    match level {
        CompilationLevel::WhitespaceOnly => "\n",
        CompilationLevel::SimpleOptimizations | CompilationLevel::AdvancedOptimizations => {
            "\n\n"
        }
    }
}

fn write_section(path: &Path, mode: OutputMode, text: &str) -> CompilerResult<()> {
    let mut file = open_output(path, mode)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(())
}
