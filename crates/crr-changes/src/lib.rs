//! # crr-changes
//!
//! Change-set synthesis for conflict-free replicated relations (CRRs).
//!
//! Every tracked table keeps a clock ledger with one entry per changed cell.
//! This crate turns table descriptors into query text that:
//! - extracts one globally ordered change stream across all tracked tables,
//!   ordered by `(version, table)` so that replicas apply edits causally
//! - reads back the current value of any single changed cell, or reports a
//!   tombstone when the change deleted the row
//!
//! Nothing here executes SQL. The caller binds the two stream parameters
//! (excluded site, minimum version), runs the queries inside one read
//! snapshot, and steps through the rows.
//!
//! ## Architecture
//!
//! - [`generator`] - ledger query for one table, projected to five columns
//! - [`composer`] - `UNION ALL` of every table, ordered, all-or-nothing
//! - [`resolver`] - per-record value lookup, failures scoped to the record
//! - [`record`] - typed change records and resume points
//! - [`config`] - ledger naming, placeholder style, column checks
//!
//! ## Example
//!
//! ```rust
//! use crr_changes::{ChangeSetComposer, PatchQuery, PatchResolver};
//! use crr_schema::TableDescriptor;
//!
//! let todos = TableDescriptor::builder("todos")
//!     .pk("id")
//!     .column("title")
//!     .build()
//!     .unwrap();
//!
//! let query = ChangeSetComposer::default().compose(&[todos.clone()]).unwrap();
//! assert!(query.sql().ends_with("ORDER BY vrsn ASC, tbl ASC"));
//!
//! let patch = PatchResolver::default().resolve(&todos, "title", "1").unwrap();
//! assert_eq!(
//!     patch,
//!     PatchQuery::Lookup("SELECT quote(\"title\") FROM \"todos\" WHERE \"id\" = 1".into())
//! );
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod generator;
pub mod ledger;
pub mod record;
pub mod resolver;

pub use composer::{ChangeSetComposer, ChangesQuery, UNION_ALL};
pub use config::{ChangesConfig, ChangesConfigBuilder, ParamStyle};
pub use error::{ChangesError, PatchError, Result};
pub use generator::table_changes_query;
pub use ledger::DELETE_SENTINEL;
pub use record::{ChangeRecord, ChangedColumn, ResumePoint, SiteId};
pub use resolver::{PatchQuery, PatchResolver, PatchValue};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::composer::{ChangeSetComposer, ChangesQuery};
    pub use crate::config::ChangesConfig;
    pub use crate::error::{ChangesError, PatchError};
    pub use crate::record::{ChangeRecord, ResumePoint, SiteId};
    pub use crate::resolver::{PatchQuery, PatchResolver, PatchValue};
    pub use crr_codec::{PkCodec, QuoteConcatCodec};
    pub use crr_schema::{TableDescriptor, TableSet};
}
