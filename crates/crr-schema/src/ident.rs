//! SQL identifiers and quoting.
//!
//! Every table and column name that ends up in generated SQL goes through
//! [`Ident`]. Construction rejects empty names and names containing NUL, which
//! SQLite cannot represent in a quoted identifier. Everything else, including
//! arbitrary Unicode, is accepted and made safe by delimiter quoting.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Quote `name` as a SQL identifier: `"name"`, with embedded `"` doubled.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    out.push_str(&name.replace('"', "\"\""));
    out.push('"');
    out
}

/// Quote `value` as a SQL string literal: `'value'`, with embedded `'` doubled.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    out.push_str(&value.replace('\'', "''"));
    out.push('\'');
    out
}

/// A validated table or column name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ident(String);

impl Ident {
    /// Validate and wrap a name.
    pub fn new(name: impl Into<String>) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::InvalidIdentifier {
                name,
                reason: "identifier is empty",
            });
        }
        if name.contains('\0') {
            return Err(SchemaError::InvalidIdentifier {
                name,
                reason: "identifier contains a NUL character",
            });
        }
        Ok(Ident(name))
    }

    /// The raw, unquoted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name quoted for use as an identifier.
    pub fn quoted(&self) -> String {
        quote_ident(&self.0)
    }

    /// The name quoted for use as a string literal.
    pub fn as_literal(&self) -> String {
        quote_literal(&self.0)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Ident {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ident {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ident::new(value)
    }
}

impl TryFrom<&str> for Ident {
    type Error = SchemaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ident::new(value)
    }
}

impl From<Ident> for String {
    fn from(ident: Ident) -> Self {
        ident.0
    }
}

impl PartialEq<str> for Ident {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Ident {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_plain() {
        assert_eq!(quote_ident("todos"), "\"todos\"");
    }

    #[test]
    fn test_quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quote_literal_doubles_quotes() {
        assert_eq!(quote_literal("it's"), "'it''s'");
        assert_eq!(quote_literal(""), "''");
    }

    #[test]
    fn test_ident_rejects_empty_and_nul() {
        assert!(matches!(
            Ident::new(""),
            Err(SchemaError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            Ident::new("a\0b"),
            Err(SchemaError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_ident_accepts_unicode() {
        let ident = Ident::new("tâches ✓").unwrap();
        assert_eq!(ident.quoted(), "\"tâches ✓\"");
        assert_eq!(ident.as_literal(), "'tâches ✓'");
    }

    #[test]
    fn test_ident_serde_validates() {
        let ident: Ident = serde_json::from_str("\"todos\"").unwrap();
        assert_eq!(ident, "todos");
        assert!(serde_json::from_str::<Ident>("\"\"").is_err());
    }
}
