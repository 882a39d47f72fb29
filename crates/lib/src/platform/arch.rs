use std::fmt;

use serde::Serialize;

/// CPU architectures a native archive can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuArch {
  X64,
  Arm64,
}

/// Machine strings, lower-cased, and the architecture each one denotes.
const ARCH_TABLE: &[(&str, CpuArch)] = &[
  ("x86_64", CpuArch::X64),
  ("x86-64", CpuArch::X64),
  ("amd64", CpuArch::X64),
  ("x64", CpuArch::X64),
  ("aarch64", CpuArch::Arm64),
  ("arm64", CpuArch::Arm64),
  ("arm64e", CpuArch::Arm64),
  ("armv8", CpuArch::Arm64),
  ("armv8l", CpuArch::Arm64),
];

impl CpuArch {
  /// Map a machine string to an architecture. Unknown strings yield `None`.
  pub fn from_host_name(name: &str) -> Option<Self> {
    let name = name.trim().to_ascii_lowercase();
    ARCH_TABLE
      .iter()
      .find(|(known, _)| *known == name)
      .map(|(_, arch)| *arch)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X64 => "x64",
      Self::Arm64 => "arm64",
    }
  }
}

impl fmt::Display for CpuArch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
