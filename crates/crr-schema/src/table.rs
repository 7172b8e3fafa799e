//! Table descriptors for tracked relations.
//!
//! A [`TableDescriptor`] is the read-only view of one table that change-set
//! synthesis works from: its name, its ordered primary-key columns and the
//! rest of its columns. A table without primary-key columns can be described
//! but is not trackable.

use crate::error::{Result, SchemaError};
use crate::ident::Ident;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single column of a tracked table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: Ident,
    /// Declared type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decl_type: Option<String>,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(ColumnInfo {
            name: Ident::new(name)?,
            decl_type: None,
        })
    }

    pub fn with_type(mut self, decl_type: impl Into<String>) -> Self {
        self.decl_type = Some(decl_type.into());
        self
    }
}

/// Description of one table whose changes are tracked in a clock ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub name: Ident,
    /// Primary-key columns, in key order.
    pub pks: Vec<ColumnInfo>,
    /// All remaining columns.
    #[serde(default)]
    pub non_pks: Vec<ColumnInfo>,
}

impl TableDescriptor {
    pub fn new(name: Ident, pks: Vec<ColumnInfo>, non_pks: Vec<ColumnInfo>) -> Self {
        TableDescriptor { name, pks, non_pks }
    }

    pub fn builder(name: impl Into<String>) -> TableDescriptorBuilder {
        TableDescriptorBuilder::new(name)
    }

    /// Whether the table has a primary key and can therefore be tracked.
    pub fn is_trackable(&self) -> bool {
        !self.pks.is_empty()
    }

    /// Fail with [`SchemaError::NoPrimaryKey`] unless the table is trackable.
    pub fn ensure_trackable(&self) -> Result<()> {
        if self.is_trackable() {
            Ok(())
        } else {
            Err(SchemaError::NoPrimaryKey {
                table: self.name.to_string(),
            })
        }
    }

    pub fn quoted_name(&self) -> String {
        self.name.quoted()
    }

    /// Look up a column by name among primary-key and non-key columns.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.pks
            .iter()
            .chain(self.non_pks.iter())
            .find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Iterate over all columns, primary-key columns first.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.pks.iter().chain(self.non_pks.iter())
    }
}

/// Builder for [`TableDescriptor`] that validates names as they are added.
#[derive(Debug)]
pub struct TableDescriptorBuilder {
    name: String,
    pks: Vec<(String, Option<String>)>,
    non_pks: Vec<(String, Option<String>)>,
}

impl TableDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pks: Vec::new(),
            non_pks: Vec::new(),
        }
    }

    pub fn pk(mut self, name: impl Into<String>) -> Self {
        self.pks.push((name.into(), None));
        self
    }

    pub fn typed_pk(mut self, name: impl Into<String>, decl_type: impl Into<String>) -> Self {
        self.pks.push((name.into(), Some(decl_type.into())));
        self
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.non_pks.push((name.into(), None));
        self
    }

    pub fn typed_column(mut self, name: impl Into<String>, decl_type: impl Into<String>) -> Self {
        self.non_pks.push((name.into(), Some(decl_type.into())));
        self
    }

    pub fn build(self) -> Result<TableDescriptor> {
        fn columns(raw: Vec<(String, Option<String>)>) -> Result<Vec<ColumnInfo>> {
            raw.into_iter()
                .map(|(name, decl_type)| {
                    Ok(ColumnInfo {
                        name: Ident::new(name)?,
                        decl_type,
                    })
                })
                .collect()
        }

        Ok(TableDescriptor {
            name: Ident::new(self.name)?,
            pks: columns(self.pks)?,
            non_pks: columns(self.non_pks)?,
        })
    }
}

/// A set of table descriptors ordered by table name.
///
/// Iteration order is the byte order of table names, so composing a change
/// set from a `TableSet` is deterministic regardless of discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TableDescriptor>", into = "Vec<TableDescriptor>")]
pub struct TableSet {
    tables: BTreeMap<Ident, TableDescriptor>,
}

impl TableSet {
    pub fn new() -> Self {
        TableSet {
            tables: BTreeMap::new(),
        }
    }

    /// Build a set, rejecting duplicate table names.
    pub fn from_tables(tables: impl IntoIterator<Item = TableDescriptor>) -> Result<Self> {
        let mut set = TableSet::new();
        for table in tables {
            set.insert(table)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, table: TableDescriptor) -> Result<()> {
        if self.tables.contains_key(&table.name) {
            return Err(SchemaError::DuplicateTable(table.name.to_string()));
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<TableDescriptor> {
        self.tables.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.values()
    }

    /// Tables that cannot be tracked because they lack a primary key.
    pub fn untrackable(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.values().filter(|t| !t.is_trackable())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TryFrom<Vec<TableDescriptor>> for TableSet {
    type Error = SchemaError;

    fn try_from(tables: Vec<TableDescriptor>) -> Result<Self> {
        TableSet::from_tables(tables)
    }
}

impl From<TableSet> for Vec<TableDescriptor> {
    fn from(set: TableSet) -> Self {
        set.tables.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a TableDescriptor;
    type IntoIter = std::collections::btree_map::Values<'a, Ident, TableDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos() -> TableDescriptor {
        TableDescriptor::builder("todos")
            .typed_pk("id", "INTEGER")
            .column("title")
            .column("done")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder() {
        let table = todos();
        assert_eq!(table.name, "todos");
        assert_eq!(table.pks.len(), 1);
        assert_eq!(table.pks[0].decl_type.as_deref(), Some("INTEGER"));
        assert_eq!(table.non_pks.len(), 2);
        assert!(table.is_trackable());
    }

    #[test]
    fn test_builder_rejects_bad_column() {
        let err = TableDescriptor::builder("t").pk("").build().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_untrackable() {
        let table = TableDescriptor::builder("log").column("line").build().unwrap();
        assert!(!table.is_trackable());
        assert_eq!(
            table.ensure_trackable(),
            Err(SchemaError::NoPrimaryKey {
                table: "log".to_string()
            })
        );
    }

    #[test]
    fn test_column_lookup() {
        let table = todos();
        assert!(table.has_column("id"));
        assert!(table.has_column("title"));
        assert!(!table.has_column("missing"));
        let names: Vec<_> = table.columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "title", "done"]);
    }

    #[test]
    fn test_table_set_orders_by_name() {
        let b = TableDescriptor::builder("b").pk("id").build().unwrap();
        let a = TableDescriptor::builder("a").pk("id").build().unwrap();
        let set = TableSet::from_tables(vec![b, a]).unwrap();
        let names: Vec<_> = set.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_table_set_rejects_duplicates() {
        let err = TableSet::from_tables(vec![todos(), todos()]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateTable("todos".to_string()));
    }

    #[test]
    fn test_table_set_untrackable() {
        let log = TableDescriptor::builder("log").column("line").build().unwrap();
        let set = TableSet::from_tables(vec![todos(), log]).unwrap();
        let names: Vec<_> = set.untrackable().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["log"]);
    }

    #[test]
    fn test_descriptor_json() {
        let json = r#"[
            {"name": "todos", "pks": [{"name": "id", "decl_type": "INTEGER"}],
             "non_pks": [{"name": "title"}]}
        ]"#;
        let set: TableSet = serde_json::from_str(json).unwrap();
        let table = set.get("todos").unwrap();
        assert_eq!(table.pks[0].name, "id");
        assert!(table.has_column("title"));

        let bad = r#"[{"name": "", "pks": []}]"#;
        assert!(serde_json::from_str::<TableSet>(bad).is_err());
    }
}
