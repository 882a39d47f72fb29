//! Platform tag resolution.
//!
//! Native artifacts are namespaced by a `{os}-{arch}` tag such as
//! `linux-x64` or `macos-arm64`. The tag is the directory the Java loader
//! looks in and the suffix of the platform archive, so it must be stable.
//!
//! Resolution goes through explicit lookup tables ([`OsFamily`],
//! [`CpuArch`]). Hosts missing from the tables are reported as unsupported
//! rather than guessed.

pub mod arch;
pub mod os;

pub use arch::CpuArch;
pub use os::OsFamily;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
  #[error("unsupported operating system: {0}")]
  UnsupportedOs(String),

  #[error("unsupported architecture: {0}")]
  UnsupportedArch(String),
}

/// Platform identifier combining OS family and architecture (e.g., "linux-x64")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformTag {
  pub os: OsFamily,
  pub arch: CpuArch,
}

impl PlatformTag {
  pub fn new(os: OsFamily, arch: CpuArch) -> Self {
    Self { os, arch }
  }

  /// Resolve a tag from host-reported OS and machine strings.
  ///
  /// Pure: the same pair always gives the same answer.
  pub fn resolve(os_name: &str, machine: &str) -> Result<Self, PlatformError> {
    let os = OsFamily::from_host_name(os_name).ok_or_else(|| PlatformError::UnsupportedOs(os_name.to_string()))?;
    let arch = CpuArch::from_host_name(machine).ok_or_else(|| PlatformError::UnsupportedArch(machine.to_string()))?;
    Ok(Self { os, arch })
  }

  /// Resolve the tag of the machine running the pipeline.
  pub fn current() -> Result<Self, PlatformError> {
    Self::resolve(std::env::consts::OS, std::env::consts::ARCH)
  }

  /// Returns the tag string (e.g., "macos-arm64")
  pub fn as_string(&self) -> String {
    format!("{}-{}", self.os, self.arch)
  }
}

impl fmt::Display for PlatformTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.os, self.arch)
  }
}
