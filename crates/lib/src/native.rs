//! Native module build.
//!
//! Drives cmake in two steps from the build directory: configure against the
//! native source directory, then build in Release mode. Produced binaries are
//! not inspected here; the assembler discovers them by name.

use std::path::PathBuf;

use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::config::Config;
use crate::exec::{self, CommandSpec, ExecError, OutputSink};

#[derive(Debug, Error)]
pub enum NativeError {
  /// The cmake source directory does not exist.
  #[error("native source directory not found: {0}")]
  MissingSource(PathBuf),

  #[error("failed to create build directory '{path}': {source}")]
  CreateBuildDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Exec(#[from] ExecError),
}

/// The configure and build invocations, in order.
pub fn build_commands(config: &Config) -> [CommandSpec; 2] {
  let layout = &config.layout;
  let cmake = &config.toolchain.cmake;
  [
    CommandSpec::new(cmake).arg(&layout.native_src).cwd(&layout.native_build),
    CommandSpec::new(cmake)
      .args(["--build", ".", "--config", "Release"])
      .cwd(&layout.native_build),
  ]
}

/// Configure and build the native module.
pub async fn build_native(config: &Config, sink: &mut dyn OutputSink) -> Result<(), NativeError> {
  let layout = &config.layout;
  if !layout.native_src.is_dir() {
    return Err(NativeError::MissingSource(layout.native_src.clone()));
  }

  fs::create_dir_all(&layout.native_build)
    .await
    .map_err(|source| NativeError::CreateBuildDir {
      path: layout.native_build.clone(),
      source,
    })?;

  info!(source = ?layout.native_src, build = ?layout.native_build, "building native module");

  for command in build_commands(config) {
    exec::run(&command, sink).await?;
  }

  Ok(())
}
