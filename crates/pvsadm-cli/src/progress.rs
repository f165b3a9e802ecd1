//! Spinners for long-running remote calls

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// Start a spinner on stderr with `message`
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(TICK);
    spinner
}

/// Stop the spinner and remove it from the terminal
pub fn complete_spinner_and_clear(spinner: ProgressBar) {
    spinner.finish_and_clear();
}

/// Stop the spinner leaving an error line behind
pub fn complete_spinner_error(spinner: ProgressBar, message: &str) {
    spinner.abandon_with_message(format!("✗ {message}"));
}
