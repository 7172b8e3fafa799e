//! Names used by the clock ledger and the change stream.
//!
//! Every tracked table `T` has a ledger table `"T__crsql_clock"` holding one
//! row per changed cell: the key columns of `T` under their own names plus the
//! changed column, its version and the site that wrote it.

/// Ledger column holding the changed column's name (or the delete sentinel).
pub const CLOCK_COL_NAME: &str = "__crsql_col_name";

/// Ledger column holding the cell version.
pub const CLOCK_VERSION: &str = "__crsql_version";

/// Ledger column holding the originating site, `NULL` for local edits.
pub const CLOCK_SITE_ID: &str = "__crsql_site_id";

/// Default suffix appended to a table name to form its ledger name.
pub const DEFAULT_CLOCK_TABLE_SUFFIX: &str = "__crsql_clock";

/// Reserved changed-column value meaning the whole row was deleted.
pub const DELETE_SENTINEL: &str = "__crsql_del";

/// Output columns of the change stream, in projection order.
pub const STREAM_COLUMNS: [&str; 5] = ["tbl", "pks", "cid", "vrsn", "site_id"];
