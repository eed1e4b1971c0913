//! Error types for reading documents and instructions.

use std::fmt;

/// Where in the input an error was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    /// Line number in the input (1-based).
    pub input_line: Option<usize>,
    /// Byte offset within that line (0-based).
    pub column: Option<usize>,
}

impl Position {
    /// Create a position on an input line.
    pub fn at_input(line: usize) -> Self {
        Self {
            input_line: Some(line),
            column: None,
        }
    }
}

/// A malformed document or instruction stream.
#[derive(Debug)]
pub struct Error {
    /// The error message.
    pub message: String,
    /// Position information for the error.
    pub position: Position,
}

impl Error {
    /// Create an error with just a message.
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: Position::default(),
        }
    }

    /// Create an error at an input line.
    pub fn at_input(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            position: Position::at_input(line),
        }
    }

    /// Add input line to an existing error.
    pub fn with_input_line(mut self, line: usize) -> Self {
        self.position.input_line = Some(line);
        self
    }

    /// Add a column to an existing error.
    pub fn with_column(mut self, column: usize) -> Self {
        self.position.column = Some(column);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        match (self.position.input_line, self.position.column) {
            (Some(line), Some(column)) => {
                write!(f, " (at input line {}, column {})", line, column)
            }
            (Some(line), None) => write!(f, " (at input line {})", line),
            (None, Some(column)) => write!(f, " (at column {})", column),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for document and instruction processing.
pub type Result<T> = std::result::Result<T, Error>;
