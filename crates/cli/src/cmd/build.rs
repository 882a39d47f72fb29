//! `l2dkit build`: native build and packaging, assuming setup already ran.

use std::time::Instant;

use anyhow::{Context, Result};

use l2dkit_lib::Config;
use l2dkit_lib::pipeline::{self, BuildReport};

use super::{console_sink, runtime};
use crate::output::{Mark, OutputFormat, elapsed, print_artifact, print_field, print_json, print_marked};

pub fn cmd_build(config: &Config, output: OutputFormat) -> Result<()> {
  let rt = runtime()?;
  let mut sink = console_sink(output);
  let start = Instant::now();

  let report = rt.block_on(pipeline::build(config, &mut sink)).context("Build failed")?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_build_report(&report);
    print_field("Time", &elapsed(start.elapsed()));
  }
  Ok(())
}

pub(super) fn print_build_report(report: &BuildReport) {
  let assembled = &report.assemble;

  println!();
  print_marked(Mark::Done, &format!("Packaged artifacts for {}", report.tag));
  for artifact in &assembled.artifacts {
    print_artifact(artifact);
  }
  print_field("Sources", &assembled.sources.to_string());
  print_field("Shaders", &assembled.shaders.len().to_string());
  print_field("Native libraries", &assembled.native_libraries.len().to_string());

  if assembled.native_libraries.is_empty() {
    print_marked(
      Mark::Warn,
      &format!("no native libraries found; the {} archive is empty", report.tag),
    );
  }
}
