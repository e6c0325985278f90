//! Output formatting for command responses.
//!
//! Supports pretty-printing to the log, JSON to any writer, and text to a file.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Writes a value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes text to `path`, replacing any existing file.
pub fn write_text_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "Output written");
    Ok(())
}
