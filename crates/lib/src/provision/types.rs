//! Types for dependency provisioning.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// One external input the pipeline downloads.
///
/// The presence of `dest` is the only signal that a dependency is already
/// provisioned. There is no version or hash check: deleting `dest` is how a
/// dependency gets refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
  pub id: String,
  pub url: String,
  pub dest: PathBuf,
  pub kind: FetchKind,
  pub transform: Transform,
}

/// How a dependency's download becomes its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
  /// Archive with exactly one top-level directory, installed as `dest`.
  Archive,
  /// Written byte-for-byte to `dest`.
  File,
}

/// Post-install step applied once, right after a dependency is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
  None,
  Patch(TextPatch),
}

/// Exact-substring replacement inside an installed dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPatch {
  /// File to patch, relative to the dependency's destination. Unused for
  /// [`FetchKind::File`] dependencies, which are patched directly.
  pub file: PathBuf,
  pub find: String,
  pub replace: String,
}

/// What provisioning did for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DependencyStatus {
  /// Destination already present, nothing downloaded.
  Cached,
  /// Downloaded and installed during this run.
  Fetched { patch: Option<PatchStatus> },
}

/// Result of applying a [`TextPatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
  /// Pattern found and replaced; the file was rewritten and re-verified.
  Applied { occurrences: usize },
  /// Pattern absent. The file was left as-is; upstream content has likely
  /// changed and the fix it carried needs review.
  Diverged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
  pub id: String,
  pub dest: PathBuf,
  #[serde(flatten)]
  pub status: DependencyStatus,
}

/// Summary of a provisioning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
  pub dependencies: Vec<DependencyReport>,
}

impl ProvisionReport {
  /// Number of dependencies downloaded during this pass.
  pub fn fetched(&self) -> usize {
    self
      .dependencies
      .iter()
      .filter(|d| matches!(d.status, DependencyStatus::Fetched { .. }))
      .count()
  }

  pub fn cached(&self) -> usize {
    self.dependencies.len() - self.fetched()
  }

  /// Dependencies whose patch found nothing to replace.
  pub fn diverged(&self) -> impl Iterator<Item = &DependencyReport> {
    self.dependencies.iter().filter(|d| {
      matches!(
        d.status,
        DependencyStatus::Fetched {
          patch: Some(PatchStatus::Diverged)
        }
      )
    })
  }
}

/// Errors that can occur while provisioning dependencies.
#[derive(Debug, Error)]
pub enum ProvisionError {
  /// The HTTP client could not be constructed.
  #[error("failed to build http client: {0}")]
  Client(#[source] reqwest::Error),

  /// Network error or non-success status.
  #[error("fetch failed for {url}: {message}")]
  Fetch { url: String, message: String },

  /// The archive could not be read or unpacked.
  #[error("failed to extract '{archive}': {message}")]
  Extract { archive: PathBuf, message: String },

  /// The archive format could not be determined from its name.
  #[error("unsupported archive format: {0}")]
  UnsupportedArchive(String),

  /// Extraction produced zero or several top-level directories.
  #[error("expected exactly one top-level directory in '{archive}', found {}", describe_found(.found))]
  ArchiveLayout { archive: PathBuf, found: Vec<String> },

  /// The file named by a patch does not exist in the installed dependency.
  #[error("patch target not found: {0}")]
  PatchTarget(PathBuf),

  /// The patched file did not read back as expected.
  #[error("patch verification failed for {0}")]
  PatchVerification(PathBuf),

  #[error("io error at '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl ProvisionError {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
    let path = path.into();
    move |source| ProvisionError::Io { path, source }
  }
}

fn describe_found(found: &[String]) -> String {
  if found.is_empty() {
    "none".to_string()
  } else {
    found.join(", ")
  }
}
