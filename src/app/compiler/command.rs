//! External tool invocation
//!
//! Command lines are assembled as plain [`ToolCommand`] values so they can be
//! inspected and logged, then run with `tokio::process`. Output capture goes
//! straight to a file handle: when stderr is merged it shares the same handle
//! as stdout, so the file keeps the tool's own interleaving.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::{CompilerError, CompilerResult};

/// How a tool's output file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Truncate,
    Append,
}

/// Program plus arguments, without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self, cwd: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(cwd).kill_on_drop(true);
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> CompilerError {
        CompilerError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    /// Run with inherited stdio
    pub async fn run(&self, cwd: &Path) -> CompilerResult<ExitStatus> {
        debug!("Running {} in {}", self, cwd.display());
        let status = self
            .command(cwd)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;
        self.check_status(status);
        Ok(status)
    }

    /// Run with stdout (and optionally stderr) written to `output`
    pub async fn run_to_file(
        &self,
        cwd: &Path,
        output: &Path,
        mode: OutputMode,
        merge_stderr: bool,
    ) -> CompilerResult<ExitStatus> {
        debug!("Running {} > {}", self, output.display());

        let file = open_output(output, mode)?;
        let stderr = if merge_stderr {
            Stdio::from(file.try_clone()?)
        } else {
            Stdio::inherit()
        };

        let status = self
            .command(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::from(file))
            .stderr(stderr)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        self.check_status(status);
        Ok(status)
    }

    fn check_status(&self, status: ExitStatus) {
        if !status.success() {
            warn!("{} exited with {}", self.program, status);
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn open_output(path: &Path, mode: OutputMode) -> CompilerResult<File> {
    let mut options = OpenOptions::new();
    match mode {
        OutputMode::Truncate => options.write(true).create(true).truncate(true),
        OutputMode::Append => options.append(true).create(true),
    };
    Ok(options.open(path)?)
}

/// Render a path argument the way the tools expect it
pub fn path_arg(path: impl AsRef<Path>) -> String {
    path.as_ref().display().to_string()
}

/// Join closure library relative paths
pub fn library_path(library: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(library.to_path_buf(), |path, part| path.join(part))
}
