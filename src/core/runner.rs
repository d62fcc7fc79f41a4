//! External command execution.
//!
//! Every tool the setup touches (git, pnpm, openssl, systemctl, curl) runs
//! through [`CommandRunner`], so tests can swap in a recording double
//! without spawning processes.

use crate::constants;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// A program, its arguments, and the directory to run it in.
///
/// The working directory is bound per invocation; the process cwd is never
/// changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Build from a `[program, args...]` vector. Returns `None` when empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).args(args))
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

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a finished command left behind.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Failure of an action-mode command. Carries the exit code `main` propagates.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` {}", describe_failure(.code, .stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl CommandError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Spawn { .. } => constants::EXIT_SPAWN_FAILED,
            CommandError::Failed { code, .. } => code.unwrap_or(1),
        }
    }
}

fn describe_failure(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated by a signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{}: {}", status, stderr)
    }
}

pub trait CommandRunner {
    /// Run to completion and capture output. Errors only when the program
    /// cannot be started.
    fn execute(&self, invocation: &Invocation) -> io::Result<Captured>;

    /// Action mode: any failure is an error.
    fn run(&self, invocation: &Invocation) -> Result<Captured, CommandError> {
        tracing::debug!(command = %invocation, cwd = ?invocation.cwd, "run");
        let captured = self
            .execute(invocation)
            .map_err(|source| CommandError::Spawn {
                command: invocation.to_string(),
                source,
            })?;
        if captured.success() {
            return Ok(captured);
        }
        Err(CommandError::Failed {
            command: invocation.to_string(),
            code: captured.code,
            stderr: String::from_utf8_lossy(&captured.stderr).into_owned(),
        })
    }

    /// Probe mode: never raises. `Some` only on success.
    fn probe(&self, invocation: &Invocation) -> Option<Captured> {
        match self.execute(invocation) {
            Ok(captured) if captured.success() => Some(captured),
            Ok(captured) => {
                tracing::debug!(command = %invocation, code = ?captured.code, "probe failed");
                None
            }
            Err(e) => {
                tracing::debug!(command = %invocation, error = %e, "probe could not start");
                None
            }
        }
    }
}

/// Production runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, invocation: &Invocation) -> io::Result<Captured> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        let output = cmd.output()?;
        Ok(Captured {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
