//! Phase ordering.
//!
//! A full run is provisioning, then tag resolution, the native build and
//! assembly. Every phase is awaited before the next starts; the first failure
//! ends the run.

use serde::Serialize;
use tracing::info;

use crate::assemble::{self, AssembleReport, JarPackager, ZipPackager};
use crate::config::{Config, Packaging};
use crate::error::Result;
use crate::exec::OutputSink;
use crate::native;
use crate::platform::PlatformTag;
use crate::provision::{self, ProvisionReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  pub tag: PlatformTag,
  pub assemble: AssembleReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
  pub setup: ProvisionReport,
  pub build: BuildReport,
}

/// Provision the SDK and headers.
pub async fn setup(config: &Config) -> Result<ProvisionReport> {
  info!(root = ?config.layout.root, "provisioning");
  Ok(provision::provision(config).await?)
}

/// Build the native module and package both archives for the current host.
pub async fn build(config: &Config, sink: &mut dyn OutputSink) -> Result<BuildReport> {
  let tag = PlatformTag::current()?;
  info!(tag = %tag, "resolved platform");

  native::build_native(config, sink).await?;

  let assemble = match config.packaging {
    Packaging::Jar => {
      let packager = JarPackager::new(&config.toolchain.jar);
      assemble::assemble(config, tag, &packager, sink).await?
    }
    Packaging::Zip => assemble::assemble(config, tag, &ZipPackager, sink).await?,
  };

  Ok(BuildReport { tag, assemble })
}

/// Setup followed by build.
pub async fn run(config: &Config, sink: &mut dyn OutputSink) -> Result<PipelineReport> {
  let setup = setup(config).await?;
  let build = build(config, sink).await?;
  Ok(PipelineReport { setup, build })
}
