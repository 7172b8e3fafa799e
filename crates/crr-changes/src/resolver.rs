//! Patch value resolution.
//!
//! Given one change record, build the query reading the current value of the
//! changed cell as a quoted literal, or report a tombstone when the record
//! deletes the whole row. Failures are scoped to the record being resolved.

use crate::config::ChangesConfig;
use crate::error::PatchError;
use crate::ledger::DELETE_SENTINEL;
use crate::record::{ChangeRecord, ChangedColumn};
use crr_codec::{CodecError, PkCodec, QuoteConcatCodec};
use crr_schema::{Ident, SqlBuf, TableDescriptor, TableSet};
use tracing::{debug, trace};

/// What to do to obtain the value carried by a change record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchQuery {
    /// The record deletes the row; there is no value to read.
    Tombstone,
    /// Run this query to read the cell's current value as a quoted literal.
    Lookup(String),
}

impl PatchQuery {
    pub fn is_tombstone(&self) -> bool {
        matches!(self, PatchQuery::Tombstone)
    }

    pub fn sql(&self) -> Option<&str> {
        match self {
            PatchQuery::Tombstone => None,
            PatchQuery::Lookup(sql) => Some(sql),
        }
    }
}

/// The value obtained for a change record once its patch query has run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchValue {
    /// Apply a deletion of the row.
    Tombstone,
    /// The cell's current value as a literal, safe to embed verbatim.
    Value(String),
    /// The lookup returned no row. The row was deleted after the ledger entry
    /// was written, or the read ran outside a stable snapshot. Not an error.
    Vanished,
}

impl PatchValue {
    /// Interpret the single column of the lookup's first row, if any.
    pub fn from_lookup(row: Option<String>) -> Self {
        match row {
            Some(literal) => PatchValue::Value(literal),
            None => PatchValue::Vanished,
        }
    }

    pub fn literal(&self) -> Option<&str> {
        match self {
            PatchValue::Value(literal) => Some(literal),
            _ => None,
        }
    }
}

/// Builds per-record value lookups.
#[derive(Clone, Debug)]
pub struct PatchResolver<C = QuoteConcatCodec> {
    config: ChangesConfig,
    codec: C,
}

impl PatchResolver<QuoteConcatCodec> {
    pub fn new(config: ChangesConfig) -> Self {
        Self::with_codec(config, QuoteConcatCodec::new())
    }
}

impl Default for PatchResolver<QuoteConcatCodec> {
    fn default() -> Self {
        Self::new(ChangesConfig::default())
    }
}

impl<C: PkCodec> PatchResolver<C> {
    pub fn with_codec(config: ChangesConfig, codec: C) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &ChangesConfig {
        &self.config
    }

    /// Resolve the changed `column` of the row identified by `pk_token`.
    ///
    /// The delete sentinel short-circuits to [`PatchQuery::Tombstone`]
    /// without touching the key or the table.
    pub fn resolve(
        &self,
        table: &TableDescriptor,
        column: &str,
        pk_token: &str,
    ) -> Result<PatchQuery, PatchError> {
        if column == DELETE_SENTINEL {
            trace!(table = %table.name, "change is a row deletion");
            return Ok(PatchQuery::Tombstone);
        }

        table.ensure_trackable()?;

        let predicate = self
            .codec
            .decode(&table.pks, pk_token)
            .map_err(|err| {
                debug!(table = %table.name, token = pk_token, error = %err, "failed to decode primary key");
                match err {
                    CodecError::Alloc(e) => PatchError::Alloc(e),
                    source => PatchError::Decode {
                        table: table.name.to_string(),
                        token: pk_token.to_string(),
                        source,
                    },
                }
            })?;

        if self.config.reject_unknown_columns && !table.has_column(column) {
            return Err(PatchError::UnknownColumn {
                table: table.name.to_string(),
                column: column.to_string(),
            });
        }
        let column = Ident::new(column)?;

        let mut sql = SqlBuf::new();
        sql.push("SELECT quote(")?
            .push_ident(column.as_str())?
            .push(") FROM ")?
            .push_ident(table.name.as_str())?
            .push(" WHERE ")?;
        predicate.write_sql(&mut sql)?;

        Ok(PatchQuery::Lookup(sql.finish()))
    }

    /// Resolve a typed changed column.
    pub fn resolve_change(
        &self,
        table: &TableDescriptor,
        column: &ChangedColumn,
        pk_token: &str,
    ) -> Result<PatchQuery, PatchError> {
        self.resolve(table, column.as_cid(), pk_token)
    }

    /// Resolve a change record, looking its table up in `tables`.
    pub fn resolve_record(
        &self,
        tables: &TableSet,
        record: &ChangeRecord,
    ) -> Result<PatchQuery, PatchError> {
        let table = tables
            .get(&record.table)
            .ok_or_else(|| PatchError::UnknownTable(record.table.clone()))?;
        self.resolve_change(table, &record.changed_column, &record.pk_token)
    }

    /// Resolve every record independently. A failure for one record does not
    /// affect the others.
    pub fn resolve_all<'a, I>(
        &self,
        tables: &TableSet,
        records: I,
    ) -> Vec<Result<PatchQuery, PatchError>>
    where
        I: IntoIterator<Item = &'a ChangeRecord>,
    {
        records
            .into_iter()
            .map(|record| self.resolve_record(tables, record))
            .collect()
    }
}
