//! UI helper functions for terminal output formatting.
//!
//! Consistent error, warning and banner output across commands.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Boxed heading used for phase changes in the interactive session.
pub fn banner(out: &mut dyn Write, title: &str) -> std::io::Result<()> {
    let rule = "=".repeat(title.chars().count() + 4);
    writeln!(out, "{}", rule)?;
    writeln!(out, "| {} |", title)?;
    writeln!(out, "{}", rule)
}
