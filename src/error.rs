//! Error types for hanlyric library.

use std::io;
use thiserror::Error;

/// Result type alias for hanlyric operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hanlyric library.
///
/// The pipeline stages themselves are total and never produce these; errors
/// come from the edges: lyrics sources, dictionary files and converter setup.
#[derive(Error, Debug)]
pub enum Error {
    /// The lyrics source could not produce any text.
    #[error("Could not retrieve lyrics: {0}")]
    SourceUnavailable(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP client setup failed. Failed requests surface as `SourceUnavailable`.
    #[cfg(feature = "genius")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The script converter could not be built.
    #[error("Script conversion setup failed: {0}")]
    Conversion(String),

    /// A romanization dictionary file is malformed.
    #[error("Invalid dictionary at line {line}: {message}")]
    InvalidDictionary { line: usize, message: String },

    /// The language name is not recognized.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::SourceUnavailable(format!("source text is not valid UTF-8: {err}"))
    }
}
