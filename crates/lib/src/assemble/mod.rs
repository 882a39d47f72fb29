//! Artifact assembly.
//!
//! Builds the staging tree under `out/` and packages it:
//!
//! 1. shaders from the SDK into `classes/live2d/shaders/`
//! 2. the binding's Java sources compiled into `classes/`, packaged as the
//!    platform-independent shared archive
//! 3. native libraries from the cmake build directory (and its `Release`/`Debug`
//!    subdirectories) into `native_res/<tag>/`, packaged as the platform
//!    archive
//!
//! Steps run in this order because later ones read what earlier ones created.
//! The shared archive never contains native binaries and the platform archive
//! never contains classes.

mod package;
mod staging;

pub use package::{JarPackager, Packager, ZipPackager};
pub use staging::StagingTree;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::exec::{self, CommandSpec, ExecError, OutputSink};
use crate::platform::PlatformTag;
use crate::util::fs::{copy_files_flat, sorted_files, walk_files};

#[derive(Debug, Error)]
pub enum AssembleError {
  /// A required input directory does not exist.
  #[error("{what} not found: {path}")]
  MissingInput { what: &'static str, path: PathBuf },

  /// The binding source root holds no source files.
  #[error("no .{extension} sources under {root}")]
  NoSources { root: PathBuf, extension: String },

  #[error("failed to package '{archive}': {source}")]
  Package {
    archive: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("io error at '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Exec(#[from] ExecError),
}

fn io_err(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> AssembleError {
  let path = path.into();
  move |source| AssembleError::Io { path, source }
}

/// Which archive an [`Artifact`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
  Shared,
  Native(PlatformTag),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub kind: ArtifactKind,
  pub path: PathBuf,
  pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembleReport {
  pub shaders: Vec<PathBuf>,
  pub sources: usize,
  /// Native libraries staged for the platform archive. Empty when the build
  /// produced nothing matching the native-module filter.
  pub native_libraries: Vec<PathBuf>,
  pub artifacts: Vec<Artifact>,
}

/// Assemble and package every artifact for `tag`.
pub async fn assemble(
  config: &Config,
  tag: PlatformTag,
  packager: &impl Packager,
  sink: &mut dyn OutputSink,
) -> Result<AssembleReport, AssembleError> {
  let layout = &config.layout;
  let naming = &config.naming;

  let staging = StagingTree::recreate(&layout.out).map_err(io_err(&layout.out))?;
  info!(out = ?staging.root(), tag = %tag, "assembling artifacts");

  let shaders = stage_shaders(config, &staging)?;

  let sources = java_sources(config)?;
  let classes = staging.classes_dir();
  exec::run(&compile_command(config, &classes, &sources), sink).await?;

  let shared_archive = layout.out.join(naming.shared_archive_name());
  packager.package(&classes, &shared_archive, sink).await?;

  let native_libraries = stage_native(config, &staging.native_tag_dir(tag))?;
  if native_libraries.is_empty() {
    warn!(
      module = %naming.native_module,
      build = ?layout.native_build,
      "no native libraries matched; platform archive will be empty"
    );
  }

  let native_archive = layout.out.join(naming.native_archive_name(tag));
  packager.package(&staging.native_res_dir(), &native_archive, sink).await?;

  let artifacts = vec![
    artifact(ArtifactKind::Shared, shared_archive)?,
    artifact(ArtifactKind::Native(tag), native_archive)?,
  ];

  staging.commit();

  Ok(AssembleReport {
    shaders,
    sources: sources.len(),
    native_libraries,
    artifacts,
  })
}

fn artifact(kind: ArtifactKind, path: PathBuf) -> Result<Artifact, AssembleError> {
  let size = fs::metadata(&path).map_err(io_err(&path))?.len();
  Ok(Artifact { kind, path, size })
}

/// Copy the SDK's shader sources into the classes tree.
fn stage_shaders(config: &Config, staging: &StagingTree) -> Result<Vec<PathBuf>, AssembleError> {
  let src = config.layout.sdk.join(&config.sdk.shader_dir);
  require_dir("shader directory", &src)?;

  let dest = staging.shaders_dir();
  fs::create_dir_all(&dest).map_err(io_err(&dest))?;

  let copied = copy_files_flat(&src, &dest).map_err(io_err(&src))?;
  debug!(count = copied.len(), "staged shaders");
  Ok(copied)
}

/// Every binding source file, sorted.
fn java_sources(config: &Config) -> Result<Vec<PathBuf>, AssembleError> {
  let root = &config.layout.java_src;
  require_dir("binding source root", root)?;

  let sources = walk_files(root, |p| config.naming.is_source_file(p)).map_err(io_err(root))?;
  if sources.is_empty() {
    return Err(AssembleError::NoSources {
      root: root.clone(),
      extension: config.naming.source_extension.clone(),
    });
  }
  Ok(sources)
}

/// `javac -d <classes> --source-path <root> <sources...>`
pub fn compile_command(config: &Config, classes: &Path, sources: &[PathBuf]) -> CommandSpec {
  CommandSpec::new(&config.toolchain.javac)
    .arg("-d")
    .arg(classes)
    .arg("--source-path")
    .arg(&config.layout.java_src)
    .args(sources)
}

/// Copy native libraries passing the module filter into `dest`.
///
/// Missing scan directories are skipped. A name found in several directories is
/// copied from each in scan order, so the last one wins.
fn stage_native(config: &Config, dest: &Path) -> Result<Vec<PathBuf>, AssembleError> {
  fs::create_dir_all(dest).map_err(io_err(dest))?;

  let mut staged: Vec<PathBuf> = Vec::new();
  for dir in config.layout.native_output_dirs() {
    if !dir.is_dir() {
      debug!(dir = ?dir, "skipping missing build output directory");
      continue;
    }

    for file in sorted_files(&dir).map_err(io_err(&dir))? {
      if !config.naming.is_native_library(&file) {
        continue;
      }
      let Some(name) = file.file_name() else { continue };
      let target = dest.join(name);
      fs::copy(&file, &target).map_err(io_err(&file))?;
      debug!(from = ?file, to = ?target, "staged native library");
      if !staged.contains(&target) {
        staged.push(target);
      }
    }
  }

  Ok(staged)
}

fn require_dir(what: &'static str, path: &Path) -> Result<(), AssembleError> {
  if path.is_dir() {
    Ok(())
  } else {
    Err(AssembleError::MissingInput {
      what,
      path: path.to_path_buf(),
    })
  }
}
