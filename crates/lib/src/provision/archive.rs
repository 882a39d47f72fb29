//! Archive extraction.
//!
//! Supports:
//! - `.zip`
//! - `.tar.gz` / `.tgz`
//! - `.tar`
//!
//! The format comes from the file name. Downloads whose URL carries no usable
//! extension (mirrors serving `download?id=5`) are identified by their leading
//! bytes instead.
//!
//! Entries are unpacked as-is. Distributions wrap their content in a single
//! versioned directory (`CubismSdkForNative-5-r.4.1/`); [`single_root`]
//! locates it so it can be installed under a stable name.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use super::types::ProvisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
  Zip,
  TarGz,
  Tar,
}

impl ArchiveFormat {
  /// Format implied by a file name's extension.
  pub fn from_name(name: &str) -> Option<Self> {
    let name = name.to_ascii_lowercase();
    if name.ends_with(".zip") {
      Some(Self::Zip)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
      Some(Self::TarGz)
    } else if name.ends_with(".tar") {
      Some(Self::Tar)
    } else {
      None
    }
  }

  /// Format implied by the first bytes of an archive.
  pub fn from_magic(header: &[u8]) -> Option<Self> {
    if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
      Some(Self::Zip)
    } else if header.starts_with(&[0x1f, 0x8b]) {
      Some(Self::TarGz)
    } else if header.get(257..262) == Some(b"ustar".as_slice()) {
      Some(Self::Tar)
    } else {
      None
    }
  }

  /// Name first, then content.
  pub fn detect(archive_path: &Path) -> Result<Self, ProvisionError> {
    let name = archive_path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();
    if let Some(format) = Self::from_name(&name) {
      return Ok(format);
    }

    let mut header = Vec::with_capacity(512);
    File::open(archive_path)
      .and_then(|file| file.take(512).read_to_end(&mut header))
      .map_err(ProvisionError::io(archive_path))?;

    let format = Self::from_magic(&header).ok_or(ProvisionError::UnsupportedArchive(name))?;
    debug!(archive = ?archive_path, format = ?format, "identified archive by content");
    Ok(format)
  }
}

/// Unpack `archive_path` into `dest`.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<(), ProvisionError> {
  let format = ArchiveFormat::detect(archive_path)?;

  fs::create_dir_all(dest).map_err(ProvisionError::io(dest))?;

  match format {
    ArchiveFormat::Zip => extract_zip(archive_path, dest)?,
    ArchiveFormat::TarGz => {
      let file = File::open(archive_path).map_err(ProvisionError::io(archive_path))?;
      extract_tar(Archive::new(GzDecoder::new(BufReader::new(file))), archive_path, dest)?;
    }
    ArchiveFormat::Tar => {
      let file = File::open(archive_path).map_err(ProvisionError::io(archive_path))?;
      extract_tar(Archive::new(BufReader::new(file)), archive_path, dest)?;
    }
  }

  debug!(archive = ?archive_path, dest = ?dest, "unpacked archive");
  Ok(())
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<(), ProvisionError> {
  let extract_err = |message: String| ProvisionError::Extract {
    archive: archive_path.to_path_buf(),
    message,
  };

  let file = File::open(archive_path).map_err(ProvisionError::io(archive_path))?;
  let mut archive =
    zip::ZipArchive::new(BufReader::new(file)).map_err(|e| extract_err(format!("failed to open zip: {e}")))?;

  for i in 0..archive.len() {
    let mut entry = archive
      .by_index(i)
      .map_err(|e| extract_err(format!("failed to read zip entry: {e}")))?;

    // Rejects absolute paths and `..` components.
    let relative = entry
      .enclosed_name()
      .ok_or_else(|| extract_err(format!("unsafe entry name: {}", entry.name())))?;
    let dest_path = dest.join(relative);

    if entry.is_dir() {
      fs::create_dir_all(&dest_path).map_err(ProvisionError::io(&dest_path))?;
      continue;
    }

    // Entries are not guaranteed to be preceded by their directories.
    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent).map_err(ProvisionError::io(parent))?;
    }

    let mut outfile = File::create(&dest_path).map_err(ProvisionError::io(&dest_path))?;
    std::io::copy(&mut entry, &mut outfile).map_err(ProvisionError::io(&dest_path))?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = entry.unix_mode() {
        fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode)).map_err(ProvisionError::io(&dest_path))?;
      }
    }
  }

  Ok(())
}

fn extract_tar<R: std::io::Read>(mut archive: Archive<R>, archive_path: &Path, dest: &Path) -> Result<(), ProvisionError> {
  archive.unpack(dest).map_err(|e| ProvisionError::Extract {
    archive: archive_path.to_path_buf(),
    message: e.to_string(),
  })
}

/// The only directory directly under `dir`.
///
/// Loose top-level files are ignored. Zero or several directories is an
/// [`ProvisionError::ArchiveLayout`] error: there is no way to tell which one
/// holds the distribution.
pub fn single_root(dir: &Path, archive: &Path) -> Result<PathBuf, ProvisionError> {
  let mut roots = Vec::new();
  for entry in fs::read_dir(dir).map_err(ProvisionError::io(dir))? {
    let entry = entry.map_err(ProvisionError::io(dir))?;
    let file_type = entry.file_type().map_err(ProvisionError::io(entry.path()))?;
    if file_type.is_dir() {
      roots.push(entry.path());
    }
  }

  if roots.len() == 1 {
    return Ok(roots.remove(0));
  }

  let mut found: Vec<String> = roots
    .iter()
    .filter_map(|p| p.file_name())
    .map(|n| n.to_string_lossy().into_owned())
    .collect();
  found.sort();

  Err(ProvisionError::ArchiveLayout {
    archive: archive.to_path_buf(),
    found,
  })
}
