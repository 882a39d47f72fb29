//! Test utilities for l2dkit-lib.
//!
//! Cross-platform shell helpers, stand-in toolchain programs, and zip
//! builders/readers for archive fixtures.

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Write an executable `/bin/sh` script standing in for a toolchain program.
///
/// Tests that spawn these should be `#[serial]`: executing a file another
/// thread still has open for writing fails with `ETXTBSY`.
#[cfg(unix)]
pub fn write_fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  std::fs::create_dir_all(dir).unwrap();
  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// Build an in-memory zip holding `files` as `(name, content)` pairs.
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
  let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
  for (name, content) in files {
    writer.start_file(*name, SimpleFileOptions::default()).unwrap();
    writer.write_all(content.as_bytes()).unwrap();
  }
  writer.finish().unwrap().into_inner()
}

pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
  std::fs::write(path, zip_bytes(files)).unwrap();
}

/// Entry names of the zip at `path`, in archive order.
pub fn zip_entries(path: &Path) -> Vec<String> {
  let archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
  archive.file_names().map(str::to_string).collect()
}

pub fn zip_read(path: &Path, name: &str) -> String {
  let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
  let mut entry = archive.by_name(name).unwrap();
  let mut content = String::new();
  entry.read_to_string(&mut content).unwrap();
  content
}
