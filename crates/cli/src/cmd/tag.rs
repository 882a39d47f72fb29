use anyhow::Result;

use l2dkit_lib::PlatformTag;

use crate::output::{OutputFormat, print_json};

/// Print the platform tag of this host.
pub fn cmd_tag(output: OutputFormat) -> Result<()> {
  let tag = PlatformTag::current().map_err(l2dkit_lib::Error::from)?;

  if output.is_json() {
    print_json(&serde_json::json!({ "tag": tag.to_string(), "os": tag.os, "arch": tag.arch }))?;
  } else {
    println!("{tag}");
  }
  Ok(())
}
