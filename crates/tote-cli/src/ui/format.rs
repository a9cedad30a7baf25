//! Formatting utilities for sizes, durations, and build summaries.

use console::Term;
use owo_colors::{OwoColorize, Stream::Stderr};
use std::time::Duration;

/// One line of the build summary.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub target: String,
    pub output: String,
    pub size: u64,
    pub elapsed: Duration,
}

/// Format file size in human-readable format.
///
/// ```
/// use tote_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use tote_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the build summary table to stderr.
///
/// Targets build concurrently, so the footer shows the wall-clock time of
/// the whole run rather than the sum of the rows.
pub fn print_build_summary(rows: &[SummaryRow], wall_time: Duration) {
    let width = (Term::stderr().size().1 as usize).min(80);
    let name_width = rows.iter().map(|r| r.target.len()).max().unwrap_or(0);
    let output_width = rows.iter().map(|r| r.output.len()).max().unwrap_or(0);

    eprintln!(
        "\n{}",
        "Build Summary".if_supports_color(Stderr, |t| t.bold().underline().to_string())
    );
    eprintln!("{}", "─".repeat(width));

    for row in rows {
        let name = format!("{:<name_width$}", row.target);
        let stats = format!("{} ({})", format_size(row.size), format_duration(row.elapsed));
        eprintln!(
            "  {} {}  {:<output_width$}  {}",
            "▸".if_supports_color(Stderr, |t| t.blue()),
            name.if_supports_color(Stderr, |t| t.bright_white().bold().to_string()),
            row.output,
            stats.if_supports_color(Stderr, |t| t.dimmed()),
        );
    }

    eprintln!("{}", "─".repeat(width));

    let total_size: u64 = rows.iter().map(|r| r.size).sum();
    let total = format!("{} in {}", format_size(total_size), format_duration(wall_time));
    eprintln!(
        "  {} {}",
        "Total:".if_supports_color(Stderr, |t| t.bold()),
        total.if_supports_color(Stderr, |t| t.green())
    );
}
