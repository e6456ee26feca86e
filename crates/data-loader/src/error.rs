//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading the program catalog.
///
/// Malformed rows are not errors: the parser skips them and logs a warning.
/// Only problems that make the whole catalog unusable end up here.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found
    #[error("Failed to open catalog file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first row is already program data
    #[error("Catalog is missing its header row")]
    MissingHeader,

    /// The header row does not describe the expected columns
    #[error("Parse error at line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// Catalog-wide validation failed
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
