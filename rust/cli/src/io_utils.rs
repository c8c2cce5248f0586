//! Stdin and filesystem helpers shared by commands.

use std::io::BufRead;

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Returns the trimmed line, or `None` on EOF or read errors.
///
/// # Example
///
/// ```rust,no_run
/// use std::io::{self, BufRead};
/// # use chamber_cli::io_utils::read_stdin_line;
///
/// let stdin = io::stdin();
/// let mut handle = stdin.lock();
/// if let Some(line) = read_stdin_line(&mut handle) {
///     println!("You entered: {}", line);
/// }
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Ensure parent directory exists for given path, creating if needed.
pub fn ensure_parent_dir(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}
