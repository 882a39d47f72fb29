//! l2dkit-lib: build orchestration for the Live2D Cubism Java binding
//!
//! Prepares a working directory and turns it into distributable archives:
//! - `provision`: fetches the Cubism SDK and the GLES2/KHR headers, once
//! - `platform`: resolves the `{os}-{arch}` tag native outputs are filed under
//! - `native`: drives cmake over the binding's native module
//! - `assemble`: compiles the Java sources and packages the shared and
//!   platform archives under `out/`
//! - `pipeline`: runs the phases in order
//!
//! Runs are not locked. Two runs against one working directory at the same
//! time must be serialized by the caller.

pub mod assemble;
pub mod config;
pub mod consts;
pub mod error;
pub mod exec;
pub mod native;
pub mod pipeline;
pub mod platform;
pub mod provision;
pub mod util;

pub use config::{Config, Packaging};
pub use error::{Error, Result};
pub use platform::PlatformTag;
