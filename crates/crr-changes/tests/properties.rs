//! Property-based tests for change-set synthesis.
//!
//! These verify, for arbitrary schemas:
//! - A table without a primary key never yields query text
//! - Every generated fragment names its table and projects one key column
//! - Composition fails wherever the untrackable table sits in the input
//! - The delete sentinel resolves to a tombstone for any key token
//! - Value lookups name exactly the requested table, column and row

use crr_changes::{
    table_changes_query, ChangeSetComposer, ChangesConfig, ChangesError, PatchQuery,
    PatchResolver, DELETE_SENTINEL, UNION_ALL,
};
use crr_codec::{PkCodec, QuoteConcatCodec, SqlValue};
use crr_schema::{quote_ident, SchemaError, TableDescriptor};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_ ]{0,10}"
}

fn table_strategy() -> impl Strategy<Value = TableDescriptor> {
    (name_strategy(), 1usize..4, 0usize..4).prop_map(|(name, pks, cols)| {
        let mut builder = TableDescriptor::builder(name);
        for i in 0..pks {
            builder = builder.pk(format!("k{}", i));
        }
        for i in 0..cols {
            builder = builder.column(format!("c{}", i));
        }
        builder.build().unwrap()
    })
}

fn tables_strategy() -> impl Strategy<Value = Vec<TableDescriptor>> {
    prop::collection::btree_set(name_strategy(), 1..6).prop_map(|names| {
        names
            .into_iter()
            .map(|name| TableDescriptor::builder(name).pk("id").build().unwrap())
            .collect()
    })
}

proptest! {
    #[test]
    fn keyless_table_yields_no_text(name in name_strategy(), cols in 0usize..4) {
        let mut builder = TableDescriptor::builder(name.clone());
        for i in 0..cols {
            builder = builder.column(format!("c{}", i));
        }
        let table = builder.build().unwrap();
        let result = table_changes_query(&table, &QuoteConcatCodec, &ChangesConfig::default());
        prop_assert_eq!(
            result,
            Err(ChangesError::Schema(SchemaError::NoPrimaryKey { table: name }))
        );
    }

    #[test]
    fn fragment_names_table_and_projects_one_key(table in table_strategy()) {
        let sql = table_changes_query(&table, &QuoteConcatCodec, &ChangesConfig::default()).unwrap();
        let literal = format!("SELECT {} AS tbl", table.name.as_literal());
        prop_assert!(sql.starts_with(&literal));
        prop_assert_eq!(sql.matches(" AS pks").count(), 1);
        prop_assert_eq!(sql.matches("quote(").count(), table.pks.len());
        let clock = format!("{}__crsql_clock", table.name);
        let from = format!("FROM {}", quote_ident(&clock));
        prop_assert!(sql.contains(&from));
    }

    #[test]
    fn composition_unions_every_table(tables in tables_strategy()) {
        let query = ChangeSetComposer::default().compose(&tables).unwrap();
        prop_assert_eq!(query.tables().len(), tables.len());
        prop_assert_eq!(query.sql().matches(UNION_ALL).count(), tables.len() - 1);
        prop_assert!(query.sql().ends_with(") ORDER BY vrsn ASC, tbl ASC"));
    }

    #[test]
    fn keyless_table_fails_composition_at_any_position(
        tables in tables_strategy(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut tables = tables;
        let at = position.index(tables.len() + 1);
        tables.insert(at, TableDescriptor::builder("untracked").column("v").build().unwrap());

        let result = ChangeSetComposer::default().compose(&tables);
        prop_assert_eq!(
            result,
            Err(ChangesError::Schema(SchemaError::NoPrimaryKey { table: "untracked".to_string() }))
        );
    }

    #[test]
    fn delete_sentinel_is_always_a_tombstone(table in table_strategy(), token in ".{0,16}") {
        let query = PatchResolver::default().resolve(&table, DELETE_SENTINEL, &token).unwrap();
        prop_assert_eq!(query, PatchQuery::Tombstone);
    }

    #[test]
    fn lookup_names_table_column_and_row(
        table in table_strategy(),
        column_index in any::<prop::sample::Index>(),
        key in any::<i64>(),
    ) {
        let columns: Vec<_> = table.columns().map(|c| c.name.to_string()).collect();
        let column = &columns[column_index.index(columns.len())];
        let values = vec![SqlValue::Integer(key); table.pks.len()];
        let codec = QuoteConcatCodec::new();
        let token = codec.encode(&table.pks, &values).unwrap();
        let predicate = codec.decode(&table.pks, &token).unwrap();

        let query = PatchResolver::default().resolve(&table, column, &token).unwrap();
        let expected = format!(
            "SELECT quote({}) FROM {} WHERE {}",
            quote_ident(column),
            table.quoted_name(),
            predicate.to_sql()
        );
        prop_assert_eq!(query, PatchQuery::Lookup(expected));
    }
}
