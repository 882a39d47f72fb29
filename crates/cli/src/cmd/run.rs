//! Default command: setup followed by build.

use std::time::Instant;

use anyhow::{Context, Result};

use l2dkit_lib::Config;
use l2dkit_lib::pipeline;

use super::build::print_build_report;
use super::setup::print_setup_report;
use super::{console_sink, runtime};
use crate::output::{OutputFormat, elapsed, print_field, print_json};

pub fn cmd_run(config: &Config, output: OutputFormat) -> Result<()> {
  let rt = runtime()?;
  let mut sink = console_sink(output);
  let start = Instant::now();

  let report = rt.block_on(pipeline::run(config, &mut sink)).context("Pipeline failed")?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_setup_report(&report.setup);
    print_build_report(&report.build);
    print_field("Time", &elapsed(start.elapsed()));
  }
  Ok(())
}
