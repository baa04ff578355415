//! CLI command implementations.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod wishlist;

use sungrove_client::{ClientEvent, EventSink};

/// Sink that forwards core events to the log.
#[derive(Debug, Clone, Copy)]
pub struct TraceSink;

impl EventSink for TraceSink {
    fn emit(&self, event: &ClientEvent) {
        tracing::info!(?event, "core event");
    }
}

/// Read one trimmed line from stdin after printing `prompt`.
pub fn prompt_line(prompt: &str) -> std::io::Result<String> {
    use std::io::Write;

    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}
