//! Filesystem helpers for staging build outputs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Copy every regular file directly inside `src` into `dest`.
///
/// Subdirectories are not descended into. Returns the copied destination
/// paths, sorted by name.
pub fn copy_files_flat(src: &Path, dest: &Path) -> io::Result<Vec<PathBuf>> {
  let mut copied = Vec::new();
  for path in sorted_files(src)? {
    let Some(name) = path.file_name() else { continue };
    let target = dest.join(name);
    fs::copy(&path, &target)?;
    copied.push(target);
  }
  Ok(copied)
}

/// Regular files directly inside `dir`, sorted by name.
pub fn sorted_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    if entry.file_type()?.is_file() {
      files.push(entry.path());
    }
  }
  files.sort();
  Ok(files)
}

/// Every file below `root` (recursively) accepted by `filter`, in sorted
/// order so tool invocations are reproducible.
pub fn walk_files(root: &Path, filter: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(io::Error::other)?;
    if entry.file_type().is_file() && filter(entry.path()) {
      files.push(entry.into_path());
    }
  }
  Ok(files)
}
