mod build;
mod run;
mod setup;
mod tag;

pub use build::cmd_build;
pub use run::cmd_run;
pub use setup::cmd_setup;
pub use tag::cmd_tag;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use l2dkit_lib::exec::ConsoleSink;

use crate::output::OutputFormat;

/// Phases run strictly one after another, so one thread is enough.
fn runtime() -> Result<Runtime> {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")
}

/// Tool output goes to stderr when stdout carries JSON.
fn console_sink(output: OutputFormat) -> ConsoleSink {
  if output.is_json() {
    ConsoleSink::Stderr
  } else {
    ConsoleSink::Stdout
  }
}
