//! Error types for primary-key encoding and decoding.

use crr_schema::AllocError;
use thiserror::Error;

/// Errors raised while encoding a key or decoding a key token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Primary key has {expected} columns but {found} values were given")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Malformed literal at part {index}: {literal:?}")]
    MalformedLiteral { index: usize, literal: String },

    #[error("Unterminated literal starting at byte {offset}")]
    UnterminatedLiteral { offset: usize },

    #[error("No primary-key columns to encode")]
    EmptyKey,

    #[error(transparent)]
    Alloc(#[from] AllocError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
