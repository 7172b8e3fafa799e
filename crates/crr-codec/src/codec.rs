//! The primary-key codec seam and its default quote-concat implementation.

use crate::error::{CodecError, Result};
use crate::predicate::PkPredicate;
use crate::value::SqlValue;
use crr_schema::{ColumnInfo, SqlBuf};

/// Separator placed between the quoted key parts of a token.
pub const PK_DELIMITER: char = '|';

/// Encodes a row's primary key into an opaque text token and back.
///
/// Implementations must round-trip: decoding the token produced for a row's
/// key values yields the predicate selecting exactly that row.
pub trait PkCodec {
    /// A SQL expression evaluating to the token of the current row.
    ///
    /// Used inside generated change queries so that tables with composite keys
    /// still project a single key column.
    fn encode_expr(&self, pks: &[ColumnInfo]) -> Result<String>;

    /// Encode key values (in key-column order) into a token.
    fn encode(&self, pks: &[ColumnInfo], values: &[SqlValue]) -> Result<String>;

    /// Decode a token into the predicate selecting its row.
    fn decode(&self, pks: &[ColumnInfo], token: &str) -> Result<PkPredicate>;
}

impl<C: PkCodec + ?Sized> PkCodec for &C {
    fn encode_expr(&self, pks: &[ColumnInfo]) -> Result<String> {
        (**self).encode_expr(pks)
    }

    fn encode(&self, pks: &[ColumnInfo], values: &[SqlValue]) -> Result<String> {
        (**self).encode(pks, values)
    }

    fn decode(&self, pks: &[ColumnInfo], token: &str) -> Result<PkPredicate> {
        (**self).decode(pks, token)
    }
}

impl<C: PkCodec + ?Sized> PkCodec for Box<C> {
    fn encode_expr(&self, pks: &[ColumnInfo]) -> Result<String> {
        (**self).encode_expr(pks)
    }

    fn encode(&self, pks: &[ColumnInfo], values: &[SqlValue]) -> Result<String> {
        (**self).encode(pks, values)
    }

    fn decode(&self, pks: &[ColumnInfo], token: &str) -> Result<PkPredicate> {
        (**self).decode(pks, token)
    }
}

/// Tokens made of each key column's `quote()` literal joined by `|`.
///
/// The token for key `('ann', 3)` is `'ann'|3`. A `|` inside a text literal is
/// not a separator, so text keys may contain any character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuoteConcatCodec;

impl QuoteConcatCodec {
    pub fn new() -> Self {
        QuoteConcatCodec
    }

    /// Split a token into its literal parts, honouring quoted sections.
    fn split(token: &str) -> Result<Vec<&str>> {
        let mut parts = Vec::new();
        let mut start = 0;
        let mut quote_start = None;

        for (i, c) in token.char_indices() {
            match c {
                '\'' => {
                    quote_start = match quote_start {
                        Some(_) => None,
                        None => Some(i),
                    };
                }
                PK_DELIMITER if quote_start.is_none() => {
                    parts.push(&token[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            }
        }

        if let Some(offset) = quote_start {
            return Err(CodecError::UnterminatedLiteral { offset });
        }
        parts.push(&token[start..]);
        Ok(parts)
    }
}

impl PkCodec for QuoteConcatCodec {
    fn encode_expr(&self, pks: &[ColumnInfo]) -> Result<String> {
        if pks.is_empty() {
            return Err(CodecError::EmptyKey);
        }
        let separator = format!(" || '{}' || ", PK_DELIMITER);
        let mut sql = SqlBuf::new();
        sql.push_joined(pks, &separator, |buf, col| {
            buf.push("quote(")?
                .push_ident(col.name.as_str())?
                .push(")")?;
            Ok(())
        })?;
        Ok(sql.finish())
    }

    fn encode(&self, pks: &[ColumnInfo], values: &[SqlValue]) -> Result<String> {
        if pks.is_empty() {
            return Err(CodecError::EmptyKey);
        }
        if pks.len() != values.len() {
            return Err(CodecError::ArityMismatch {
                expected: pks.len(),
                found: values.len(),
            });
        }
        let delimiter = PK_DELIMITER.to_string();
        let mut token = SqlBuf::new();
        token.push_joined(values, &delimiter, |buf, value| {
            buf.push(&value.to_literal())?;
            Ok(())
        })?;
        Ok(token.finish())
    }

    fn decode(&self, pks: &[ColumnInfo], token: &str) -> Result<PkPredicate> {
        if pks.is_empty() {
            return Err(CodecError::EmptyKey);
        }
        let parts = Self::split(token)?;
        if parts.len() != pks.len() {
            return Err(CodecError::ArityMismatch {
                expected: pks.len(),
                found: parts.len(),
            });
        }

        let values = parts
            .iter()
            .enumerate()
            .map(|(index, part)| {
                SqlValue::parse_literal(part).ok_or_else(|| CodecError::MalformedLiteral {
                    index,
                    literal: part.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        PkPredicate::selecting(pks, &values)
    }
}
