//! Change-set composition.
//!
//! The composer runs the per-table generator over every tracked table, joins
//! the fragments with `UNION ALL` and orders the result by
//! `(vrsn ASC, tbl ASC)`. That order is the causal contract of the stream:
//! replicas apply records by increasing version, so a later edit to a cell
//! always lands after an earlier one.
//!
//! Composition is all-or-nothing. If any table cannot be tracked the whole
//! call fails and every fragment built so far is dropped.

use crate::config::{ChangesConfig, ParamStyle};
use crate::error::Result;
use crate::generator::table_changes_query;
use crr_codec::{PkCodec, QuoteConcatCodec};
use crr_schema::{SqlBuf, TableDescriptor, TableSet};
use std::fmt;
use tracing::{debug, warn};

/// Keyword joining per-table fragments. Keeps duplicates: the same cell can
/// appear once per version.
pub const UNION_ALL: &str = "UNION ALL";

const OUTER_SELECT: &str = "SELECT tbl, pks, cid, vrsn, site_id FROM (";
const OUTER_ORDER: &str = ") ORDER BY vrsn ASC, tbl ASC";

/// A composed change-stream query with two unbound parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangesQuery {
    sql: String,
    tables: Vec<String>,
    param_style: ParamStyle,
}

impl ChangesQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }

    /// Tables included in the stream, in composition order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Whether the stream covers no tables and therefore yields no rows.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Placeholder to bind to the excluded site id.
    pub fn excluded_site_param(&self) -> &'static str {
        self.param_style.excluded_site()
    }

    /// Placeholder to bind to the minimum version.
    pub fn min_version_param(&self) -> &'static str {
        self.param_style.min_version()
    }
}

impl fmt::Display for ChangesQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Builds the globally ordered change-stream query over a set of tables.
#[derive(Clone, Debug)]
pub struct ChangeSetComposer<C = QuoteConcatCodec> {
    config: ChangesConfig,
    codec: C,
}

impl ChangeSetComposer<QuoteConcatCodec> {
    /// Create a composer using the default quote-concat key codec.
    pub fn new(config: ChangesConfig) -> Self {
        Self::with_codec(config, QuoteConcatCodec::new())
    }
}

impl Default for ChangeSetComposer<QuoteConcatCodec> {
    fn default() -> Self {
        Self::new(ChangesConfig::default())
    }
}

impl<C: PkCodec> ChangeSetComposer<C> {
    pub fn with_codec(config: ChangesConfig, codec: C) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &ChangesConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The ledger query for a single table.
    pub fn table_query(&self, table: &TableDescriptor) -> Result<String> {
        table_changes_query(table, &self.codec, &self.config)
    }

    /// Compose the change stream over `tables`.
    ///
    /// With no tables the result is a valid query over the stream columns that
    /// returns no rows and still names both parameters, so callers can bind
    /// uniformly.
    pub fn compose<'a, I>(&self, tables: I) -> Result<ChangesQuery>
    where
        I: IntoIterator<Item = &'a TableDescriptor>,
    {
        let mut fragments: Vec<String> = Vec::new();
        let mut names: Vec<String> = Vec::new();

        for table in tables {
            match self.table_query(table) {
                Ok(fragment) => {
                    fragments.push(fragment);
                    names.push(table.name.to_string());
                }
                Err(err) => {
                    warn!(
                        table = %table.name,
                        discarded = fragments.len(),
                        error = %err,
                        "aborting change set composition"
                    );
                    return Err(err);
                }
            }
        }

        if fragments.is_empty() {
            return self.empty_stream();
        }

        let separator = format!(" {} ", UNION_ALL);
        let body: usize = fragments.iter().map(String::len).sum::<usize>()
            + separator.len() * (fragments.len() - 1);
        let mut sql = SqlBuf::with_capacity(OUTER_SELECT.len() + body + OUTER_ORDER.len())?;
        sql.push(OUTER_SELECT)?;
        sql.push_joined(&fragments, &separator, |buf, fragment| {
            buf.push(fragment)?;
            Ok(())
        })?;
        sql.push(OUTER_ORDER)?;

        debug!(
            tables = names.len(),
            bytes = sql.len(),
            "composed change set query"
        );
        Ok(ChangesQuery {
            sql: sql.finish(),
            tables: names,
            param_style: self.config.param_style,
        })
    }

    /// Compose the change stream over a name-ordered table set.
    pub fn compose_set(&self, tables: &TableSet) -> Result<ChangesQuery> {
        self.compose(tables)
    }

    fn empty_stream(&self) -> Result<ChangesQuery> {
        let params = self.config.param_style;
        let mut sql = SqlBuf::new();
        sql.push(OUTER_SELECT)?
            .push("SELECT NULL AS tbl, NULL AS pks, NULL AS cid, NULL AS vrsn, NULL AS site_id")?;
        // x IS NOT x never holds, even for NULL.
        let (site, version) = (params.excluded_site(), params.min_version());
        sql.push(" WHERE ")?
            .push(site)?
            .push(" IS NOT ")?
            .push(site)?
            .push(" AND ")?
            .push(version)?
            .push(" IS NOT ")?
            .push(version)?;
        sql.push(OUTER_ORDER)?;

        debug!("composed empty change set query, no tables are tracked");
        Ok(ChangesQuery {
            sql: sql.finish(),
            tables: Vec::new(),
            param_style: params,
        })
    }
}
