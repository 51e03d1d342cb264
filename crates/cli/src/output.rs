//! Terminal output for the CLI.
//!
//! Status lines go to stdout with a colored symbol prefix; warnings and
//! errors go to stderr. Colors are dropped when the stream is not a terminal.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

/// Format of `ariadist info`
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

/// Prefixes for the status lines printed by `build`, `info` and `install`.
pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Archive size for the build summary, in binary units
pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [(&str, u64); 3] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10)];

  UNITS
    .iter()
    .find(|(_, size)| bytes >= *size)
    .map(|(unit, size)| format!("{:.1} {}", bytes as f64 / *size as f64, unit))
    .unwrap_or_else(|| format!("{} B", bytes))
}

/// Wall-clock time of a pipeline run; full builds take minutes
pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  match secs {
    60.. => format!("{}m {}s", secs / 60, secs % 60),
    1.. => format!("{}.{:02}s", secs, duration.subsec_millis() / 10),
    0 => format!("{}ms", duration.subsec_millis()),
  }
}

/// Bold heading printed before a long-running command
pub fn print_banner(title: &str) {
  println!(
    "{} {}",
    symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
    title.if_supports_color(Stream::Stdout, |s| s.bold())
  );
}

/// A stage or command finished
pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

/// The final error of a failed run, on stderr
pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

/// Non-fatal problems such as placeholder substitutions or a skipped PATH update
pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

/// Follow-up hints for the user
pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

/// Indented `label: value` line of a summary block
pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// Machine-readable output for `--output json`
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
  println!("{}", json);
  Ok(())
}
