//! Error types for the CLI application.
//!
//! Command handlers return [`CliError`] and propagate with `?`; [`crate::run`] turns
//! any error into exit code 2.

use std::fmt;

use chamber_engine::errors::GameError;

#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine rejected an action or its configuration
    Engine(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_keep_their_message() {
        let e: CliError = GameError::NoDiscardsRemaining.into();
        assert!(matches!(e, CliError::Engine(_)));
        assert!(e.to_string().starts_with("Engine error: "));
    }

    #[test]
    fn io_errors_expose_source() {
        use std::error::Error;
        let e: CliError = std::io::Error::other("boom").into();
        assert!(e.source().is_some());
    }
}
