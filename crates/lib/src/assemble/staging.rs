use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::platform::PlatformTag;

/// The output root, recreated from scratch for one assembly.
///
/// [`StagingTree::recreate`] deletes whatever was there before. Until
/// [`StagingTree::commit`] is called the tree is provisional: dropping it
/// (an early `?` return, a panic unwinding) removes the whole root, so a
/// failed run never leaves a half-populated tree that looks like output.
#[derive(Debug)]
pub struct StagingTree {
  root: PathBuf,
  committed: bool,
}

impl StagingTree {
  pub fn recreate(root: &Path) -> io::Result<Self> {
    if root.exists() {
      debug!(path = ?root, "clearing previous output");
      fs::remove_dir_all(root)?;
    }
    fs::create_dir_all(root)?;
    Ok(Self {
      root: root.to_path_buf(),
      committed: false,
    })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Compiled classes, the content of the shared archive.
  pub fn classes_dir(&self) -> PathBuf {
    self.root.join("classes")
  }

  /// Shader resources, at the path the Java loader reads them from.
  pub fn shaders_dir(&self) -> PathBuf {
    self.classes_dir().join("live2d").join("shaders")
  }

  /// Root of the platform archive. Holds one directory per tag.
  pub fn native_res_dir(&self) -> PathBuf {
    self.root.join("native_res")
  }

  pub fn native_tag_dir(&self, tag: PlatformTag) -> PathBuf {
    self.native_res_dir().join(tag.to_string())
  }

  /// Keep the tree.
  pub fn commit(mut self) {
    self.committed = true;
  }
}

impl Drop for StagingTree {
  fn drop(&mut self) {
    if self.committed {
      return;
    }
    if let Err(err) = fs::remove_dir_all(&self.root) {
      warn!(path = ?self.root, error = %err, "failed to discard incomplete output");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::{CpuArch, OsFamily};
  use tempfile::TempDir;

  #[test]
  fn recreate_discards_previous_content() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("classes")).unwrap();
    fs::write(out.join("stale.jar"), "old").unwrap();

    let staging = StagingTree::recreate(&out).unwrap();

    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    staging.commit();
  }

  #[test]
  fn committed_tree_survives_drop() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let staging = StagingTree::recreate(&out).unwrap();
    fs::write(out.join("artifact.jar"), "new").unwrap();
    staging.commit();

    assert!(out.join("artifact.jar").is_file());
  }

  #[test]
  fn uncommitted_tree_is_removed_on_drop() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    {
      let staging = StagingTree::recreate(&out).unwrap();
      fs::create_dir_all(staging.shaders_dir()).unwrap();
    }

    assert!(!out.exists());
  }

  #[test]
  fn subtree_paths() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let staging = StagingTree::recreate(&out).unwrap();
    let tag = PlatformTag::new(OsFamily::Linux, CpuArch::Arm64);

    assert_eq!(staging.shaders_dir(), out.join("classes").join("live2d").join("shaders"));
    assert_eq!(staging.native_tag_dir(tag), out.join("native_res").join("linux-arm64"));
    staging.commit();
  }
}
