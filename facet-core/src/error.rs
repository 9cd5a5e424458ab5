/// Error type shared by every fallible core operation
use std::fmt;

/// Errors raised by geometry construction, mesh mutation and mesh I/O
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter or buffer operation outside its valid domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Malformed mesh text. `line` is 1-based, 0 for structural problems.
    #[error("mesh format error at line {line}: {message}")]
    Format { line: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl fmt::Display) -> Self {
        Self::InvalidArgument(message.to_string())
    }

    pub(crate) fn format(line: usize, message: impl fmt::Display) -> Self {
        Self::Format {
            line,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
