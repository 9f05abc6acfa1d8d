//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, Log, Metadata, Record};
use std::path::{Path, PathBuf};

/// Progress bar for a batch of `files` encodes; the message shows the last
/// file finished.
pub fn encode_progress_bar(files: usize, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let style =
        ProgressStyle::with_template("{spinner:.green} {pos}/{len} files [{wide_bar:.cyan/blue}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(files as u64).with_style(style.progress_chars("=> "))
}

/// Writes log records to stderr.
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Map `-v` occurrences to a log level.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger.
pub fn init_logging(verbosity: u8) {
    let level = level_for_verbosity(verbosity);
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}

/// Where the WebP file for `input` goes.
///
/// - No output: next to the input
/// - Output is a directory (or several inputs): inside it
/// - Otherwise: the output path itself
pub fn webp_output_path(input: &Path, output: Option<&Path>, multiple: bool) -> PathBuf {
    let file_name = input.with_extension("webp");
    let file_name = file_name.file_name().unwrap_or_default();

    match output {
        None => input.with_extension("webp"),
        Some(dir) if multiple || dir.is_dir() => dir.join(file_name),
        Some(path) => path.to_path_buf(),
    }
}

/// Format a byte count for humans.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
