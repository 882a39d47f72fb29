//! Archive packaging.
//!
//! A [`Packager`] turns one staged directory into one archive. The directory's
//! content becomes the archive root, so `native_res/linux-x64/lib.so` is
//! stored as `linux-x64/lib.so`.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

use super::AssembleError;
use crate::consts::APP_NAME;
use crate::exec::{self, CommandSpec, OutputSink};

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub trait Packager {
  fn package(
    &self,
    src_dir: &Path,
    archive: &Path,
    sink: &mut dyn OutputSink,
  ) -> impl Future<Output = Result<(), AssembleError>>;
}

/// Packages with the JDK `jar` tool.
#[derive(Debug, Clone)]
pub struct JarPackager {
  program: String,
}

impl JarPackager {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }

  pub fn command(&self, src_dir: &Path, archive: &Path) -> CommandSpec {
    CommandSpec::new(&self.program)
      .args(["--create", "--file"])
      .arg(archive)
      .arg("-C")
      .arg(src_dir)
      .arg(".")
  }
}

impl Packager for JarPackager {
  async fn package(&self, src_dir: &Path, archive: &Path, sink: &mut dyn OutputSink) -> Result<(), AssembleError> {
    exec::run(&self.command(src_dir, archive), sink).await?;
    Ok(())
  }
}

/// Writes jar-compatible zip archives in-process.
///
/// Output matches what `jar --create` produces closely enough for class
/// loading: a manifest first, then directories and files in sorted order with
/// `/` separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl Packager for ZipPackager {
  async fn package(&self, src_dir: &Path, archive: &Path, _sink: &mut dyn OutputSink) -> Result<(), AssembleError> {
    write_jar(src_dir, archive).map_err(|source| AssembleError::Package {
      archive: archive.to_path_buf(),
      source,
    })
  }
}

fn write_jar(src_dir: &Path, archive: &Path) -> io::Result<()> {
  let file = File::create(archive)?;
  let mut writer = zip::ZipWriter::new(BufWriter::new(file));
  let options = SimpleFileOptions::default();
  let mut written: HashSet<String> = HashSet::new();

  writer.add_directory("META-INF/", options).map_err(io::Error::other)?;
  writer.start_file(MANIFEST_PATH, options).map_err(io::Error::other)?;
  writer.write_all(format!("Manifest-Version: 1.0\r\nCreated-By: {APP_NAME}\r\n\r\n").as_bytes())?;
  written.insert("META-INF/".to_string());
  written.insert(MANIFEST_PATH.to_string());

  for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(io::Error::other)?;
    let relative = entry.path().strip_prefix(src_dir).map_err(io::Error::other)?;
    let mut name = relative
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");

    if entry.file_type().is_dir() {
      name.push('/');
      if written.insert(name.clone()) {
        writer.add_directory(name, options).map_err(io::Error::other)?;
      }
    } else if entry.file_type().is_file() {
      if !written.insert(name.clone()) {
        continue;
      }
      writer.start_file(name, options).map_err(io::Error::other)?;
      io::copy(&mut File::open(entry.path())?, &mut writer)?;
    }
  }

  writer.finish().map_err(io::Error::other)?.flush()?;
  debug!(archive = ?archive, entries = written.len(), "wrote archive");
  Ok(())
}
