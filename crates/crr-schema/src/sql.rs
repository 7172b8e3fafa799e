//! Owned query text buffer with fallible growth.
//!
//! Query text is assembled into a single owned [`SqlBuf`]. Growth reserves
//! capacity with `try_reserve`, so running out of memory surfaces as an
//! [`AllocError`] and the partially built text is dropped with the buffer.

use crate::ident::{quote_ident, quote_literal};
use std::fmt;
use thiserror::Error;

/// Failed to grow a query buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Failed to allocate {requested} bytes of query text")]
pub struct AllocError {
    pub requested: usize,
}

/// An owned, growable buffer of SQL text.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SqlBuf {
    buf: String,
}

impl SqlBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        SqlBuf { buf: String::new() }
    }

    /// Create a buffer with room for at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut buf = SqlBuf::new();
        buf.reserve(capacity)?;
        Ok(buf)
    }

    fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.buf
            .try_reserve(additional)
            .map_err(|_| AllocError {
                requested: self.buf.len().saturating_add(additional),
            })
    }

    /// Append raw SQL.
    pub fn push(&mut self, sql: &str) -> Result<&mut Self, AllocError> {
        self.reserve(sql.len())?;
        self.buf.push_str(sql);
        Ok(self)
    }

    /// Append `name` quoted as an identifier.
    pub fn push_ident(&mut self, name: &str) -> Result<&mut Self, AllocError> {
        self.push(&quote_ident(name))
    }

    /// Append `value` quoted as a string literal.
    pub fn push_literal(&mut self, value: &str) -> Result<&mut Self, AllocError> {
        self.push(&quote_literal(value))
    }

    /// Append each item produced by `f`, separated by `sep`.
    pub fn push_joined<I, F>(&mut self, items: I, sep: &str, mut f: F) -> Result<&mut Self, AllocError>
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item) -> Result<(), AllocError>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(sep)?;
            }
            f(&mut *self, item)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Hand the finished text to the caller.
    pub fn finish(self) -> String {
        self.buf
    }
}

impl fmt::Debug for SqlBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlBuf({:?})", self.buf)
    }
}

impl fmt::Display for SqlBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
