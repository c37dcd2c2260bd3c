//! Spinner shown while waiting for a non-streamed result

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Reports that a long-running request is in flight.
///
/// Hidden when progress is disabled (`--quiet` or `[repl] show_progress`).
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Start a spinner with `message`.
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A reporter that draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn new(enabled: bool, message: &str) -> Self {
        if enabled {
            Self::start(message)
        } else {
            Self::hidden()
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
