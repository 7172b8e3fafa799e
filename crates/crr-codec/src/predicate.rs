//! Row-selecting predicates decoded from primary-key tokens.

use crate::error::{CodecError, Result};
use crate::value::SqlValue;
use crr_schema::{AllocError, ColumnInfo, Ident, SqlBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `column = value` term of a primary-key predicate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PkTerm {
    pub column: Ident,
    pub value: SqlValue,
}

/// Conjunction of equality terms that selects exactly one row by primary key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PkPredicate {
    terms: Vec<PkTerm>,
}

impl PkPredicate {
    /// The predicate selecting the row whose key columns hold `values`.
    pub fn selecting(pks: &[ColumnInfo], values: &[SqlValue]) -> Result<Self> {
        if pks.len() != values.len() {
            return Err(CodecError::ArityMismatch {
                expected: pks.len(),
                found: values.len(),
            });
        }
        Ok(PkPredicate {
            terms: pks
                .iter()
                .zip(values)
                .map(|(col, value)| PkTerm {
                    column: col.name.clone(),
                    value: value.clone(),
                })
                .collect(),
        })
    }

    pub fn terms(&self) -> &[PkTerm] {
        &self.terms
    }

    /// The key values in column order.
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.terms.iter().map(|t| &t.value)
    }

    /// Append the predicate's SQL to `sql`.
    ///
    /// Null key values compare with `IS NULL`, which is the only way such a
    /// row can be selected.
    pub fn write_sql(&self, sql: &mut SqlBuf) -> std::result::Result<(), AllocError> {
        sql.push_joined(&self.terms, " AND ", |buf, term| {
            buf.push_ident(term.column.as_str())?;
            if term.value.is_null() {
                buf.push(" IS NULL")?;
            } else {
                buf.push(" = ")?.push(&term.value.to_literal())?;
            }
            Ok(())
        })?;
        Ok(())
    }

    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PkPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            f.write_str(&term.column.quoted())?;
            if term.value.is_null() {
                f.write_str(" IS NULL")?;
            } else {
                write!(f, " = {}", term.value.to_literal())?;
            }
        }
        Ok(())
    }
}
