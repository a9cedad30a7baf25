//! Terminal output: status messages and the build summary.
//!
//! ```no_run
//! use tote_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Resolving version...");
//! ui::success("Build complete");
//! ```

mod format;
mod messages;

pub use format::{SummaryRow, format_duration, format_size, print_build_summary};
pub use messages::{error, info, success, warning};

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colors follow whether
/// stderr is attended.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply the color choice for all terminal output.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    owo_colors::set_override(enabled);
    console::set_colors_enabled_stderr(enabled);
}
