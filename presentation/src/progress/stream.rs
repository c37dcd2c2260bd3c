//! Terminal renderer for streamed replies

use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;
use studio_application::FragmentSink;
use studio_domain::Model;

/// Prints each fragment to stdout as soon as it arrives.
#[derive(Default)]
pub struct ConsoleStreamSink {
    /// Whether the last byte printed was a newline
    at_line_start: Mutex<bool>,
    show_header: bool,
}

impl ConsoleStreamSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a `model ›` header before the reply.
    pub fn with_header(mut self) -> Self {
        self.show_header = true;
        self
    }
}

impl FragmentSink for ConsoleStreamSink {
    fn on_stream_start(&self, model: Model) {
        if self.show_header {
            println!("{}", format!("{} ›", model.display_name()).green().bold());
        }
        *self.at_line_start.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    fn on_fragment(&self, fragment: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(fragment.as_bytes());
        let _ = stdout.flush();
        *self.at_line_start.lock().unwrap_or_else(|e| e.into_inner()) = fragment.ends_with('\n');
    }

    fn on_stream_end(&self) {
        let at_line_start = *self.at_line_start.lock().unwrap_or_else(|e| e.into_inner());
        if !at_line_start {
            println!();
        }
    }
}
