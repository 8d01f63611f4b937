//! Error types for SAV file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing SAV files.
#[derive(Debug, Error)]
pub enum SavError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Not an SPSS system file, or a structurally broken one.
    #[error("invalid SAV file: {message}")]
    InvalidFormat { message: String },

    /// Compression scheme this reader does not implement.
    #[error("unsupported SAV compression code {code}")]
    UnsupportedCompression { code: i32 },

    /// Data ended in the middle of a record.
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// Dictionary record with an unknown type tag.
    #[error("unknown record type {record_type} at offset {offset}")]
    UnknownRecordType { record_type: i32, offset: usize },

    /// Value label record pointing at a slot that is not a variable.
    #[error("value labels reference invalid variable index {index}")]
    InvalidVariableIndex { index: i32 },

    /// Case data that does not end on a case boundary.
    #[error("unexpected trailing bytes in case data")]
    TrailingBytes,

    /// Invalid variable name (empty or not encodable).
    #[error("invalid variable name: '{name}'")]
    InvalidVariableName { name: String },

    /// Duplicate variable name.
    #[error("duplicate variable name: {name}")]
    DuplicateVariable { name: String },

    /// Row length mismatch.
    #[error("row {row} has {actual} values, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Value kind does not match the variable type.
    #[error("value in row {row} does not match the type of variable {name}")]
    ValueTypeMismatch { row: usize, name: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// DataFrame conversion error.
    #[cfg(feature = "polars")]
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result type alias for SAV operations.
pub type Result<T> = std::result::Result<T, SavError>;

impl SavError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an InvalidVariableName error.
    pub fn invalid_variable_name(name: impl Into<String>) -> Self {
        Self::InvalidVariableName { name: name.into() }
    }

    /// Create a DuplicateVariable error.
    pub fn duplicate_variable(name: impl Into<String>) -> Self {
        Self::DuplicateVariable { name: name.into() }
    }
}
