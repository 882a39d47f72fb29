//! External process execution.
//!
//! Every tool the pipeline drives (cmake, javac, jar) goes through [`run`].
//! Output from stdout and stderr is forwarded line by line to an
//! [`OutputSink`] as soon as it arrives, so a long native build that hangs is
//! visible while it hangs. A non-zero exit becomes [`ExecError::Failed`]
//! carrying the exit code, which the binary mirrors as its own.

mod sink;

pub use sink::{ConsoleSink, OutputSink};

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program could not be started (not installed, not executable).
  #[error("failed to start `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran and exited unsuccessfully.
  #[error("command failed with exit code {}: {command}", display_code(.code))]
  Failed { command: String, code: Option<i32> },

  /// Reading the program's output or waiting for it failed.
  #[error("io error while running `{command}`: {source}")]
  Io {
    command: String,
    #[source]
    source: std::io::Error,
  },
}

impl ExecError {
  /// Exit code the orchestrator should terminate with.
  ///
  /// The failing program's own code when it has one, 1 otherwise (spawn
  /// failures, termination by signal).
  pub fn exit_code(&self) -> i32 {
    match self {
      ExecError::Failed { code: Some(code), .. } => *code,
      _ => 1,
    }
  }
}

fn display_code(code: &Option<i32>) -> String {
  match code {
    Some(code) => code.to_string(),
    None => "none (terminated by signal)".to_string(),
  }
}

/// An argument vector plus optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl AsRef<std::ffi::OsStr>) -> Self {
    self.args.push(arg.as_ref().to_string_lossy().into_owned());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
  {
    self
      .args
      .extend(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
    self
  }

  pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Run a command to completion, streaming merged output into `sink`.
///
/// Lines from stdout and stderr are delivered in arrival order. Returns once
/// both streams are closed and the process has exited.
pub async fn run(spec: &CommandSpec, sink: &mut dyn OutputSink) -> Result<(), ExecError> {
  let command_line = spec.to_string();
  info!(command = %command_line, "executing");

  let mut command = Command::new(&spec.program);
  command
    .args(&spec.args)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

  if let Some(cwd) = &spec.cwd {
    command.current_dir(cwd);
  }

  debug!(program = %spec.program, cwd = ?spec.cwd, "spawning process");

  let mut child = command.spawn().map_err(|source| ExecError::Spawn {
    command: command_line.clone(),
    source,
  })?;

  let io_err = |source: std::io::Error| ExecError::Io {
    command: command_line.clone(),
    source,
  };

  let stdout = child
    .stdout
    .take()
    .ok_or_else(|| io_err(std::io::Error::other("stdout was not captured")))?;
  let stderr = child
    .stderr
    .take()
    .ok_or_else(|| io_err(std::io::Error::other("stderr was not captured")))?;

  forward_merged(stdout, stderr, sink).await.map_err(io_err)?;

  let status = child.wait().await.map_err(io_err)?;

  if !status.success() {
    return Err(ExecError::Failed {
      command: command_line,
      code: status.code(),
    });
  }

  debug!(command = %command_line, "command finished");
  Ok(())
}

/// Pump both pipes until each reaches EOF.
///
/// Lines are split on `\n` and decoded lossily: compilers on some hosts emit
/// output in the console code page rather than UTF-8.
async fn forward_merged<O, E>(stdout: O, stderr: E, sink: &mut dyn OutputSink) -> std::io::Result<()>
where
  O: AsyncRead + Unpin,
  E: AsyncRead + Unpin,
{
  let mut out = BufReader::new(stdout).split(b'\n');
  let mut err = BufReader::new(stderr).split(b'\n');
  let (mut out_open, mut err_open) = (true, true);

  while out_open || err_open {
    tokio::select! {
      segment = out.next_segment(), if out_open => match segment? {
        Some(bytes) => emit(sink, &bytes),
        None => out_open = false,
      },
      segment = err.next_segment(), if err_open => match segment? {
        Some(bytes) => emit(sink, &bytes),
        None => err_open = false,
      },
    }
  }

  Ok(())
}

fn emit(sink: &mut dyn OutputSink, bytes: &[u8]) {
  let line = String::from_utf8_lossy(bytes);
  sink.line(line.trim_end_matches('\r'));
}
