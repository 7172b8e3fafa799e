//! Per-table change query generation.
//!
//! For one tracked table this builds the query selecting its clock ledger,
//! projected into the uniform five-column stream shape
//! `(tbl, pks, cid, vrsn, site_id)`. The composite key is packed into one
//! column by the codec so that every table unions with the same width.

use crate::config::ChangesConfig;
use crate::error::{ChangesError, Result};
use crate::ledger::{CLOCK_COL_NAME, CLOCK_SITE_ID, CLOCK_VERSION};
use crr_codec::PkCodec;
use crr_schema::{SqlBuf, TableDescriptor};
use tracing::trace;

/// Build the ledger query for a single table.
///
/// Fails with [`crr_schema::SchemaError::NoPrimaryKey`] when the table has no
/// primary key. The excluded-site and minimum-version parameters are left
/// unbound.
pub fn table_changes_query<C>(
    table: &TableDescriptor,
    codec: &C,
    config: &ChangesConfig,
) -> Result<String>
where
    C: PkCodec + ?Sized,
{
    table.ensure_trackable()?;

    let name = table.name.as_str();
    let pks = codec
        .encode_expr(&table.pks)
        .map_err(|err| ChangesError::key_expression(name, err))?;
    let clock_table = config.clock_table_name(&table.name);
    let params = config.param_style;

    let mut sql = SqlBuf::with_capacity(pks.len() + clock_table.len() + 2 * name.len() + 192)?;
    sql.push("SELECT ")?
        .push_literal(name)?
        .push(" AS tbl, ")?
        .push(&pks)?
        .push(" AS pks, ")?
        .push_ident(CLOCK_COL_NAME)?
        .push(" AS cid, ")?
        .push_ident(CLOCK_VERSION)?
        .push(" AS vrsn, ")?
        .push_ident(CLOCK_SITE_ID)?
        .push(" AS site_id FROM ")?
        .push_ident(&clock_table)?;

    // IS NOT keeps local edits, whose site is NULL.
    sql.push(" WHERE ")?
        .push_ident(CLOCK_SITE_ID)?
        .push(" IS NOT ")?
        .push(params.excluded_site())?
        .push(" AND ")?
        .push_ident(CLOCK_VERSION)?
        .push(" > ")?
        .push(params.min_version())?;

    trace!(table = name, bytes = sql.len(), "built table change query");
    Ok(sql.finish())
}
