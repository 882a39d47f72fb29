use std::fmt;

use serde::Serialize;

/// Operating-system families a native archive can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
  Windows,
  Linux,
  MacOs,
}

/// Host OS names, lower-cased, and the family each one belongs to.
///
/// Covers both the Rust target names (`std::env::consts::OS`) and the
/// kernel-style names other tools report (`uname -s`, `platform.system()`).
const OS_TABLE: &[(&str, OsFamily)] = &[
  ("darwin", OsFamily::MacOs),
  ("macos", OsFamily::MacOs),
  ("mac os x", OsFamily::MacOs),
  ("linux", OsFamily::Linux),
  ("windows", OsFamily::Windows),
  ("windows_nt", OsFamily::Windows),
];

impl OsFamily {
  /// Map a host OS name to its family. Unknown names yield `None`.
  pub fn from_host_name(name: &str) -> Option<Self> {
    let name = name.trim().to_ascii_lowercase();
    OS_TABLE
      .iter()
      .find(|(known, _)| *known == name)
      .map(|(_, family)| *family)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Windows => "windows",
      Self::Linux => "linux",
      Self::MacOs => "macos",
    }
  }
}

impl fmt::Display for OsFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
