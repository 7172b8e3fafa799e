//! Change records and resumable extraction state.
//!
//! A [`ChangeRecord`] is one row of the composed change stream. Records are
//! produced by executing the synthesized query elsewhere; this module only
//! gives them a typed shape.

use crate::ledger::DELETE_SENTINEL;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a participant in the replication topology.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteId(Vec<u8>);

impl SiteId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        SiteId(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SiteId({})", self.to_hex())
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<&[u8]> for SiteId {
    fn from(bytes: &[u8]) -> Self {
        SiteId(bytes.to_vec())
    }
}

impl From<Vec<u8>> for SiteId {
    fn from(bytes: Vec<u8>) -> Self {
        SiteId(bytes)
    }
}

/// The column a change record refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangedColumn {
    /// A single cell of the row changed.
    Column(String),
    /// The whole row was deleted.
    Delete,
}

impl ChangedColumn {
    /// Interpret a raw `cid` value from the change stream.
    pub fn from_cid(cid: &str) -> Self {
        if cid == DELETE_SENTINEL {
            ChangedColumn::Delete
        } else {
            ChangedColumn::Column(cid.to_string())
        }
    }

    /// The raw `cid` value as it appears in the ledger.
    pub fn as_cid(&self) -> &str {
        match self {
            ChangedColumn::Column(name) => name,
            ChangedColumn::Delete => DELETE_SENTINEL,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, ChangedColumn::Delete)
    }
}

impl From<String> for ChangedColumn {
    fn from(cid: String) -> Self {
        if cid == DELETE_SENTINEL {
            ChangedColumn::Delete
        } else {
            ChangedColumn::Column(cid)
        }
    }
}

impl From<ChangedColumn> for String {
    fn from(column: ChangedColumn) -> Self {
        match column {
            ChangedColumn::Column(name) => name,
            ChangedColumn::Delete => DELETE_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for ChangedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cid())
    }
}

/// One entry of the global change stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Table the change belongs to.
    pub table: String,
    /// Encoded primary key of the changed row.
    pub pk_token: String,
    /// Changed column, or [`ChangedColumn::Delete`].
    pub changed_column: ChangedColumn,
    /// Cell version assigned by the write path.
    pub version: u64,
    /// Originating site; `None` for local edits.
    pub site_id: Option<SiteId>,
}

impl ChangeRecord {
    pub fn new(
        table: impl Into<String>,
        pk_token: impl Into<String>,
        cid: &str,
        version: u64,
        site_id: Option<SiteId>,
    ) -> Self {
        Self {
            table: table.into(),
            pk_token: pk_token.into(),
            changed_column: ChangedColumn::from_cid(cid),
            version,
            site_id,
        }
    }

    pub fn is_delete(&self) -> bool {
        self.changed_column.is_delete()
    }

    pub fn is_local(&self) -> bool {
        self.site_id.is_none()
    }

    /// Position of this record in the global stream order.
    pub fn stream_key(&self) -> (u64, &str) {
        (self.version, &self.table)
    }
}

/// Where an incremental extraction resumes.
///
/// Binds the two runtime parameters of a composed change query. Call
/// [`ResumePoint::observe`] once every record of a version has been consumed;
/// resuming in the middle of a version would skip that version's remaining
/// records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    /// Site whose edits are filtered out, usually the requesting replica.
    pub excluded_site: Option<SiteId>,
    /// Only records with a version strictly above this are returned.
    pub min_version: u64,
}

impl ResumePoint {
    pub fn new(excluded_site: Option<SiteId>) -> Self {
        Self {
            excluded_site,
            min_version: 0,
        }
    }

    pub fn since(mut self, version: u64) -> Self {
        self.min_version = version;
        self
    }

    /// Advance past `record`. Never moves backwards.
    pub fn observe(&mut self, record: &ChangeRecord) {
        self.min_version = self.min_version.max(record.version);
    }

    /// Advance past every record in `records`.
    pub fn observe_all<'a>(&mut self, records: impl IntoIterator<Item = &'a ChangeRecord>) {
        for record in records {
            self.observe(record);
        }
    }

    /// Minimum version as a SQL integer, saturating at `i64::MAX`.
    pub fn min_version_param(&self) -> i64 {
        i64::try_from(self.min_version).unwrap_or(i64::MAX)
    }

    /// Excluded site as a SQL blob.
    ///
    /// Without an excluded site this is the empty blob rather than `NULL`:
    /// `site IS NOT NULL` would drop local edits, whose site is `NULL`.
    pub fn excluded_site_param(&self) -> &[u8] {
        self.excluded_site
            .as_ref()
            .map(SiteId::as_bytes)
            .unwrap_or_default()
    }
}
