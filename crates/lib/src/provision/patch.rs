//! One-time text patches applied to freshly installed dependencies.

use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use super::types::{PatchStatus, ProvisionError, TextPatch};

/// Outcome of [`apply_patch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
  /// Every occurrence of the pattern was replaced.
  Applied { content: String, occurrences: usize },
  /// The pattern does not occur in the input.
  NotFound,
}

/// Replace every occurrence of `find` with `replace`.
///
/// Pure: no I/O, and the same input always yields the same outcome. An empty
/// pattern never matches.
pub fn apply_patch(content: &str, find: &str, replace: &str) -> PatchOutcome {
  if find.is_empty() {
    return PatchOutcome::NotFound;
  }

  let occurrences = content.matches(find).count();
  if occurrences == 0 {
    return PatchOutcome::NotFound;
  }

  PatchOutcome::Applied {
    content: content.replace(find, replace),
    occurrences,
  }
}

/// Whether `content` looks like the output of a successful patch.
fn is_patched(content: &str, patch: &TextPatch) -> bool {
  let replaced = content.contains(&patch.replace);
  // When the replacement itself contains the pattern, the pattern is expected
  // to still be present.
  let pattern_gone = patch.replace.contains(&patch.find) || !content.contains(&patch.find);
  replaced && pattern_gone
}

/// Apply `patch` to the file it names under `root`, then read it back.
///
/// A missing pattern is not an error: the file is left unchanged and
/// [`PatchStatus::Diverged`] is returned so the caller can surface it.
pub async fn patch_file(root: &Path, patch: &TextPatch) -> Result<PatchStatus, ProvisionError> {
  patch_in_place(&root.join(&patch.file), patch).await
}

/// Apply `patch` to `path` itself, ignoring `patch.file`.
pub(crate) async fn patch_in_place(path: &Path, patch: &TextPatch) -> Result<PatchStatus, ProvisionError> {
  let path = path.to_path_buf();
  if !path.is_file() {
    return Err(ProvisionError::PatchTarget(path));
  }

  let content = fs::read_to_string(&path).await.map_err(ProvisionError::io(&path))?;

  match apply_patch(&content, &patch.find, &patch.replace) {
    PatchOutcome::Applied {
      content: patched,
      occurrences,
    } => {
      fs::write(&path, &patched).await.map_err(ProvisionError::io(&path))?;

      let written = fs::read_to_string(&path).await.map_err(ProvisionError::io(&path))?;
      if written != patched || !is_patched(&written, patch) {
        return Err(ProvisionError::PatchVerification(path));
      }

      info!(file = ?path, occurrences, "applied patch");
      Ok(PatchStatus::Applied { occurrences })
    }
    PatchOutcome::NotFound => {
      warn!(
        file = ?path,
        pattern = %patch.find,
        "patch pattern not found, file left unchanged; upstream source may have diverged"
      );
      Ok(PatchStatus::Diverged)
    }
  }
}
