//! Environment provisioning.
//!
//! Makes sure the working directory holds every external input the native
//! build needs:
//!
//! - the Cubism SDK, downloaded as an archive, installed under `sdk/` and
//!   patched once
//! - the GLES2/KHR headers, downloaded one by one into `native/include/`
//!
//! Each dependency is skipped when its destination already exists, so a second
//! pass over the same directory performs no network requests. Dependencies are
//! resolved in order and the first failure aborts the pass.
//!
//! Provisioning takes no lock. Two runs against the same working directory at
//! once can race on the scratch and destination paths; callers must serialize
//! them.

mod archive;
mod fetch;
mod patch;
mod types;

pub use archive::{ArchiveFormat, extract, single_root};
pub use fetch::{download_to, http_client, url_to_filename};
pub use patch::{PatchOutcome, apply_patch, patch_file};
pub use types::*;

use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use crate::config::Config;
use crate::consts::APP_NAME;
use patch::patch_in_place;

/// Provision every dependency named by `config`.
pub async fn provision(config: &Config) -> Result<ProvisionReport, ProvisionError> {
  let client = http_client(&config.user_agent)?;
  let mut report = ProvisionReport::default();

  for dep in config.dependencies() {
    let status = ensure(&client, &dep).await?;
    report.dependencies.push(DependencyReport {
      id: dep.id,
      dest: dep.dest,
      status,
    });
  }

  info!(
    fetched = report.fetched(),
    cached = report.cached(),
    "provisioning complete"
  );
  Ok(report)
}

/// Provision a single dependency unless its destination already exists.
pub async fn ensure(client: &reqwest::Client, dep: &Dependency) -> Result<DependencyStatus, ProvisionError> {
  if dep.dest.exists() {
    debug!(id = %dep.id, dest = ?dep.dest, "already provisioned");
    return Ok(DependencyStatus::Cached);
  }

  let patch = match dep.kind {
    FetchKind::Archive => install_archive(client, &dep.url, &dep.dest, &dep.transform).await?,
    FetchKind::File => install_file(client, &dep.url, &dep.dest, &dep.transform).await?,
  };
  info!(id = %dep.id, dest = ?dep.dest, "installed");

  Ok(DependencyStatus::Fetched { patch })
}

/// Download an archive, unpack it, patch it and move its single top-level
/// directory to `dest`.
///
/// All intermediate files live in a scratch directory next to `dest`, which is
/// removed whether or not installation succeeds. Being on the same filesystem
/// lets the final step be a rename. Nothing reaches `dest` unless the patch
/// step succeeded, so a failed install is retried on the next pass.
async fn install_archive(
  client: &reqwest::Client,
  url: &str,
  dest: &Path,
  transform: &Transform,
) -> Result<Option<PatchStatus>, ProvisionError> {
  let parent = parent_dir(dest);
  fs::create_dir_all(parent).await.map_err(ProvisionError::io(parent))?;

  let scratch = tempfile::Builder::new()
    .prefix(&format!(".{APP_NAME}-"))
    .tempdir_in(parent)
    .map_err(ProvisionError::io(parent))?;

  let archive_path = scratch.path().join(url_to_filename(url));
  download_to(client, url, &archive_path).await?;

  let extract_dir = scratch.path().join("extract");
  extract(&archive_path, &extract_dir)?;
  let root = single_root(&extract_dir, &archive_path)?;

  let patch = match transform {
    Transform::None => None,
    Transform::Patch(patch) => Some(patch_file(&root, patch).await?),
  };

  debug!(from = ?root, to = ?dest, "installing extracted tree");
  fs::rename(&root, dest).await.map_err(ProvisionError::io(dest))?;

  scratch.close().map_err(ProvisionError::io(parent))?;
  Ok(patch)
}

/// Download a single file to `dest`, creating parent directories.
///
/// A patch applies to the downloaded file itself, before it is moved into
/// place.
async fn install_file(
  client: &reqwest::Client,
  url: &str,
  dest: &Path,
  transform: &Transform,
) -> Result<Option<PatchStatus>, ProvisionError> {
  let parent = parent_dir(dest);
  fs::create_dir_all(parent).await.map_err(ProvisionError::io(parent))?;

  let part = tempfile::Builder::new()
    .prefix(&format!(".{APP_NAME}-"))
    .suffix(".part")
    .tempfile_in(parent)
    .map_err(ProvisionError::io(parent))?;

  download_to(client, url, part.path()).await?;

  let patch = match transform {
    Transform::None => None,
    Transform::Patch(patch) => Some(patch_in_place(part.path(), patch).await?),
  };

  part.persist(dest).map_err(|e| ProvisionError::Io {
    path: dest.to_path_buf(),
    source: e.error,
  })?;
  Ok(patch)
}

fn parent_dir(path: &Path) -> &Path {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  }
}
