//! Error types for change-set synthesis and patch resolution.
//!
//! The two enums split along failure scope. A [`ChangesError`] fails a whole
//! change-set composition. A [`PatchError`] concerns a single change record
//! and leaves the enumeration of other records untouched.

use crr_codec::CodecError;
use crr_schema::{AllocError, SchemaError};
use thiserror::Error;

/// Errors that abort change-set query synthesis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChangesError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to build primary-key expression for table {table}: {source}")]
    KeyExpression {
        table: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ChangesError {
    pub(crate) fn key_expression(table: &str, err: CodecError) -> Self {
        match err {
            CodecError::Alloc(e) => ChangesError::Alloc(e),
            CodecError::EmptyKey => ChangesError::Schema(SchemaError::NoPrimaryKey {
                table: table.to_string(),
            }),
            source => ChangesError::KeyExpression {
                table: table.to_string(),
                source,
            },
        }
    }
}

impl From<serde_json::Error> for ChangesError {
    fn from(err: serde_json::Error) -> Self {
        ChangesError::Config(err.to_string())
    }
}

/// Errors resolving the current value of one changed cell.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Failed to decode primary key {token:?} of table {table}: {source}")]
    Decode {
        table: String,
        token: String,
        #[source]
        source: CodecError,
    },

    #[error("Table {table} has no column {column}")]
    UnknownColumn { table: String, column: String },

    #[error("Table is not tracked: {0}")]
    UnknownTable(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Alloc(#[from] AllocError),
}

pub type Result<T> = std::result::Result<T, ChangesError>;
