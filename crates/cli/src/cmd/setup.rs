//! `l2dkit setup`: fetch the SDK and headers without building.

use anyhow::{Context, Result};

use l2dkit_lib::Config;
use l2dkit_lib::pipeline;
use l2dkit_lib::provision::ProvisionReport;

use super::runtime;
use crate::output::{OutputFormat, print_dependency, print_field, print_json};

pub fn cmd_setup(config: &Config, output: OutputFormat) -> Result<()> {
  let rt = runtime()?;
  let report = rt.block_on(pipeline::setup(config)).context("Provisioning failed")?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_setup_report(&report);
  }
  Ok(())
}

pub(super) fn print_setup_report(report: &ProvisionReport) {
  for dep in &report.dependencies {
    print_dependency(dep);
  }

  print_field("Fetched", &report.fetched().to_string());
  print_field("Cached", &report.cached().to_string());
}
