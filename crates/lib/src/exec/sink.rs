use std::io::Write;

/// Receives subprocess output one line at a time.
pub trait OutputSink {
  fn line(&mut self, line: &str);
}

/// Collects lines in memory.
impl OutputSink for Vec<String> {
  fn line(&mut self, line: &str) {
    self.push(line.to_string());
  }
}

/// Writes lines straight to the terminal as they arrive.
#[derive(Debug, Clone, Copy)]
pub enum ConsoleSink {
  Stdout,
  /// Used when stdout is reserved for machine-readable output.
  Stderr,
}

impl OutputSink for ConsoleSink {
  fn line(&mut self, line: &str) {
    // A closed terminal is not a reason to abort a build.
    let _ = match self {
      ConsoleSink::Stdout => writeln!(std::io::stdout().lock(), "{line}"),
      ConsoleSink::Stderr => writeln!(std::io::stderr().lock(), "{line}"),
    };
  }
}
