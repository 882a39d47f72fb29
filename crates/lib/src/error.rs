use thiserror::Error;

use crate::assemble::AssembleError;
use crate::exec::ExecError;
use crate::native::NativeError;
use crate::platform::PlatformError;
use crate::provision::ProvisionError;

/// Any failure that stops a pipeline run.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Platform(#[from] PlatformError),

  #[error(transparent)]
  Provision(#[from] ProvisionError),

  #[error(transparent)]
  Native(#[from] NativeError),

  #[error(transparent)]
  Assemble(#[from] AssembleError),
}

impl Error {
  /// The subprocess failure behind this error, if there is one.
  pub fn exec(&self) -> Option<&ExecError> {
    match self {
      Error::Native(NativeError::Exec(err)) | Error::Assemble(AssembleError::Exec(err)) => Some(err),
      _ => None,
    }
  }

  /// Process exit code for this failure: the failing tool's own code, 1 for
  /// everything else.
  pub fn exit_code(&self) -> i32 {
    self.exec().map_or(1, ExecError::exit_code)
  }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn tool_exit_code_is_mirrored() {
    let err = Error::from(NativeError::Exec(ExecError::Failed {
      command: "cmake --build . --config Release".to_string(),
      code: Some(7),
    }));
    assert_eq!(err.exit_code(), 7);

    let err = Error::from(AssembleError::Exec(ExecError::Failed {
      command: "javac".to_string(),
      code: Some(2),
    }));
    assert_eq!(err.exit_code(), 2);
  }

  #[test]
  fn other_failures_exit_with_one() {
    let signalled = Error::from(NativeError::Exec(ExecError::Failed {
      command: "cmake".to_string(),
      code: None,
    }));
    assert_eq!(signalled.exit_code(), 1);

    let missing = Error::from(NativeError::MissingSource(PathBuf::from("/work/native")));
    assert_eq!(missing.exit_code(), 1);
    assert!(missing.exec().is_none());

    let platform = Error::from(PlatformError::UnsupportedOs("SunOS".to_string()));
    assert_eq!(platform.exit_code(), 1);
  }

  #[test]
  fn messages_pass_through() {
    let err = Error::from(ProvisionError::PatchTarget(PathBuf::from("sdk/Framework/x.tpp")));
    assert_eq!(err.to_string(), "patch target not found: sdk/Framework/x.tpp");
  }
}
