//! Terminal rendering of setup and build reports.
//!
//! Human-readable text goes to stdout with a colored status mark per line;
//! `--output json` prints the report structs as-is instead.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use l2dkit_lib::assemble::{Artifact, ArtifactKind};
use l2dkit_lib::provision::{DependencyReport, DependencyStatus, PatchStatus};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Leading mark of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
  Done,
  Skipped,
  Warn,
  Failed,
}

impl Mark {
  fn symbol(self) -> &'static str {
    match self {
      Mark::Done => "✓",
      Mark::Skipped => "•",
      Mark::Warn => "⚠",
      Mark::Failed => "✗",
    }
  }
}

/// Print one marked line. Warnings and failures go to stderr.
pub fn print_marked(mark: Mark, message: &str) {
  match mark {
    Mark::Done => println!(
      "{} {message}",
      mark.symbol().if_supports_color(Stream::Stdout, |s| s.green())
    ),
    Mark::Skipped => println!(
      "{} {message}",
      mark.symbol().if_supports_color(Stream::Stdout, |s| s.blue())
    ),
    Mark::Warn => eprintln!(
      "{} {}",
      mark.symbol().if_supports_color(Stream::Stderr, |s| s.yellow()),
      message.if_supports_color(Stream::Stderr, |s| s.yellow())
    ),
    Mark::Failed => eprintln!(
      "{} {}",
      mark.symbol().if_supports_color(Stream::Stderr, |s| s.red()),
      message.if_supports_color(Stream::Stderr, |s| s.red())
    ),
  }
}

pub fn print_error(message: &str) {
  print_marked(Mark::Failed, message);
}

/// Indented `label: value` line under the last marked line.
pub fn print_field(label: &str, value: &str) {
  println!(
    "  {}: {value}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
}

/// Lines describing what provisioning did for one dependency.
pub fn dependency_lines(dep: &DependencyReport) -> Vec<(Mark, String)> {
  match &dep.status {
    DependencyStatus::Cached => vec![(Mark::Skipped, format!("{}: already present", dep.id))],
    DependencyStatus::Fetched { patch } => {
      let mut lines = vec![(Mark::Done, format!("{}: installed at {}", dep.id, dep.dest.display()))];
      match patch {
        Some(PatchStatus::Applied { occurrences: 1 }) => {
          lines.push((Mark::Done, format!("{}: patched 1 occurrence", dep.id)));
        }
        Some(PatchStatus::Applied { occurrences }) => {
          lines.push((Mark::Done, format!("{}: patched {occurrences} occurrences", dep.id)));
        }
        Some(PatchStatus::Diverged) => lines.push((
          Mark::Warn,
          format!("{}: patch pattern not found, upstream source may have changed", dep.id),
        )),
        None => {}
      }
      lines
    }
  }
}

pub fn print_dependency(dep: &DependencyReport) {
  for (mark, line) in dependency_lines(dep) {
    print_marked(mark, &line);
  }
}

/// `shared` or `native <tag>`.
pub fn artifact_label(kind: &ArtifactKind) -> String {
  match kind {
    ArtifactKind::Shared => "shared".to_string(),
    ArtifactKind::Native(tag) => format!("native {tag}"),
  }
}

pub fn print_artifact(artifact: &Artifact) {
  print_field(
    &artifact_label(&artifact.kind),
    &format!("{} ({})", artifact.path.display(), archive_size(artifact.size)),
  );
}

/// Archive size in binary units, one decimal above a KiB.
pub fn archive_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

  if bytes < 1024 {
    return format!("{bytes} B");
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{value:.1} {}", UNITS[unit])
}

/// Wall time of a run: `850ms`, `12.4s` or `3m07s`.
pub fn elapsed(duration: Duration) -> String {
  let secs = duration.as_secs();
  if secs >= 60 {
    format!("{}m{:02}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{:.1}s", duration.as_secs_f64())
  } else {
    format!("{}ms", duration.as_millis())
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
  println!("{json}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use l2dkit_lib::PlatformTag;
  use l2dkit_lib::platform::{CpuArch, OsFamily};
  use std::path::PathBuf;

  fn sdk_report(status: DependencyStatus) -> DependencyReport {
    DependencyReport {
      id: "cubism-sdk".to_string(),
      dest: PathBuf::from("/work/sdk"),
      status,
    }
  }

  #[test]
  fn cached_dependency_is_one_skipped_line() {
    assert_eq!(
      dependency_lines(&sdk_report(DependencyStatus::Cached)),
      vec![(Mark::Skipped, "cubism-sdk: already present".to_string())]
    );
  }

  #[test]
  fn fetched_dependency_reports_its_patch() {
    let lines = dependency_lines(&sdk_report(DependencyStatus::Fetched {
      patch: Some(PatchStatus::Applied { occurrences: 2 }),
    }));

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], (Mark::Done, "cubism-sdk: installed at /work/sdk".to_string()));
    assert_eq!(lines[1], (Mark::Done, "cubism-sdk: patched 2 occurrences".to_string()));
  }

  #[test]
  fn diverged_patch_is_a_warning() {
    let lines = dependency_lines(&sdk_report(DependencyStatus::Fetched {
      patch: Some(PatchStatus::Diverged),
    }));

    assert_eq!(lines[1].0, Mark::Warn);
    assert!(lines[1].1.contains("patch pattern not found"));
  }

  #[test]
  fn header_without_patch_is_one_line() {
    let dep = DependencyReport {
      id: "GLES2/gl2.h".to_string(),
      dest: PathBuf::from("/work/native/include/GLES2/gl2.h"),
      status: DependencyStatus::Fetched { patch: None },
    };
    assert_eq!(dependency_lines(&dep).len(), 1);
  }

  #[test]
  fn artifact_labels_name_the_platform() {
    let tag = PlatformTag {
      os: OsFamily::Linux,
      arch: CpuArch::X64,
    };
    assert_eq!(artifact_label(&ArtifactKind::Shared), "shared");
    assert_eq!(artifact_label(&ArtifactKind::Native(tag)), "native linux-x64");
  }

  #[test]
  fn archive_sizes() {
    assert_eq!(archive_size(0), "0 B");
    assert_eq!(archive_size(1023), "1023 B");
    assert_eq!(archive_size(2048), "2.0 KiB");
    assert_eq!(archive_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MiB");
  }

  #[test]
  fn elapsed_times() {
    assert_eq!(elapsed(Duration::from_millis(850)), "850ms");
    assert_eq!(elapsed(Duration::from_millis(12_400)), "12.4s");
    assert_eq!(elapsed(Duration::from_secs(187)), "3m07s");
  }
}
