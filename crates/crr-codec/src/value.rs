//! SQL values and their literal form.
//!
//! Literals follow SQLite's `quote()` output: `NULL`, integers in decimal,
//! reals with a fractional part or exponent, `'text'` with doubled quotes and
//! `X'0A1B'` blobs. A value rendered by [`SqlValue::to_literal`] can be
//! embedded verbatim in a statement and parses back with
//! [`SqlValue::parse_literal`].

use crr_schema::quote_literal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed SQL value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn text(value: impl Into<String>) -> Self {
        SqlValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Render the value as a literal that is safe to embed in a statement.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(i) => i.to_string(),
            // SQLite stores NaN as NULL and prints infinities as out-of-range reals.
            SqlValue::Real(r) if r.is_nan() => "NULL".to_string(),
            SqlValue::Real(r) if r.is_infinite() => {
                if *r > 0.0 {
                    "9.0e+999".to_string()
                } else {
                    "-9.0e+999".to_string()
                }
            }
            SqlValue::Real(r) => format!("{:?}", r),
            SqlValue::Text(s) => quote_literal(s),
            SqlValue::Blob(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 3);
                out.push_str("X'");
                for b in bytes {
                    out.push_str(&format!("{:02X}", b));
                }
                out.push('\'');
                out
            }
        }
    }

    /// Parse a single literal. Returns `None` if `literal` is not one of the
    /// forms produced by [`SqlValue::to_literal`] or SQLite's `quote()`.
    pub fn parse_literal(literal: &str) -> Option<SqlValue> {
        if literal.eq_ignore_ascii_case("NULL") {
            return Some(SqlValue::Null);
        }

        if let Some(rest) = literal.strip_prefix('\'') {
            return parse_text(rest).map(SqlValue::Text);
        }

        if let Some(rest) = literal
            .strip_prefix("X'")
            .or_else(|| literal.strip_prefix("x'"))
        {
            return parse_blob(rest).map(SqlValue::Blob);
        }

        parse_number(literal)
    }
}

/// Parse the body of a text literal (after the opening quote).
fn parse_text(body: &str) -> Option<String> {
    let inner = body.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // Inside a literal a quote only appears doubled.
            if chars.next() != Some('\'') {
                return None;
            }
        }
        out.push(c);
    }
    Some(out)
}

fn parse_blob(body: &str) -> Option<Vec<u8>> {
    let hex = body.strip_suffix('\'')?;
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let digits = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(digits, 16).ok()
        })
        .collect()
}

fn parse_number(literal: &str) -> Option<SqlValue> {
    let numeric = !literal.is_empty()
        && literal.bytes().any(|b| b.is_ascii_digit())
        && literal
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !numeric {
        return None;
    }

    if literal.contains(['.', 'e', 'E']) {
        literal.parse::<f64>().ok().map(SqlValue::Real)
    } else {
        literal.parse::<i64>().ok().map(SqlValue::Integer)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(SqlValue::Null.to_literal(), "NULL");
        assert_eq!(SqlValue::Integer(-42).to_literal(), "-42");
        assert_eq!(SqlValue::Real(1.5).to_literal(), "1.5");
        assert_eq!(SqlValue::Real(2.0).to_literal(), "2.0");
        assert_eq!(SqlValue::text("it's").to_literal(), "'it''s'");
        assert_eq!(SqlValue::Blob(vec![0x0a, 0xff]).to_literal(), "X'0AFF'");
    }

    #[test]
    fn test_non_finite_reals() {
        assert_eq!(SqlValue::Real(f64::NAN).to_literal(), "NULL");
        assert_eq!(SqlValue::Real(f64::INFINITY).to_literal(), "9.0e+999");
        assert_eq!(
            SqlValue::parse_literal("-9.0e+999"),
            Some(SqlValue::Real(f64::NEG_INFINITY))
        );
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(SqlValue::parse_literal("null"), Some(SqlValue::Null));
        assert_eq!(SqlValue::parse_literal("17"), Some(SqlValue::Integer(17)));
        assert_eq!(SqlValue::parse_literal("1.0e+20"), Some(SqlValue::Real(1.0e20)));
        assert_eq!(
            SqlValue::parse_literal("'a|b''c'"),
            Some(SqlValue::text("a|b'c"))
        );
        assert_eq!(
            SqlValue::parse_literal("x'00ab'"),
            Some(SqlValue::Blob(vec![0x00, 0xab]))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(SqlValue::parse_literal(""), None);
        assert_eq!(SqlValue::parse_literal("abc"), None);
        assert_eq!(SqlValue::parse_literal("1; DROP TABLE t"), None);
        assert_eq!(SqlValue::parse_literal("'open"), None);
        assert_eq!(SqlValue::parse_literal("'a'b'"), None);
        assert_eq!(SqlValue::parse_literal("X'ABC'"), None);
        assert_eq!(SqlValue::parse_literal("inf"), None);
        assert_eq!(SqlValue::parse_literal("--"), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some("x")), SqlValue::text("x"));
    }
}
