//! Error types for the schema layer.

use crate::sql::AllocError;
use thiserror::Error;

/// Errors raised while describing or validating tracked tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Table is not trackable, it has no primary key: {table}")]
    NoPrimaryKey { table: String },

    #[error("Invalid identifier {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },

    #[error("Table described more than once: {0}")]
    DuplicateTable(String),

    #[error(transparent)]
    Alloc(#[from] AllocError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
