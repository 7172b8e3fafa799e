//! # crr-schema
//!
//! Schema layer for conflict-free replicated relations (CRRs).
//!
//! This crate provides:
//! - Validated SQL identifiers and the quoting policy used by every query we emit
//! - Table descriptors (name, ordered primary-key columns, remaining columns)
//! - A name-ordered table set for deterministic change-set composition
//! - An owned query buffer that reports allocation failure instead of aborting
//!
//! Descriptors are produced by schema introspection elsewhere; this crate only
//! models them.
//!
//! ## Example
//!
//! ```rust
//! use crr_schema::{TableDescriptor, TableSet};
//!
//! let todos = TableDescriptor::builder("todos")
//!     .pk("id")
//!     .column("title")
//!     .column("done")
//!     .build()
//!     .unwrap();
//!
//! assert!(todos.is_trackable());
//! assert_eq!(todos.quoted_name(), "\"todos\"");
//!
//! let set = TableSet::from_tables(vec![todos]).unwrap();
//! assert!(set.get("todos").is_some());
//! ```

mod error;
mod ident;
mod sql;
mod table;

pub use error::{Result, SchemaError};
pub use ident::{quote_ident, quote_literal, Ident};
pub use sql::{AllocError, SqlBuf};
pub use table::{ColumnInfo, TableDescriptor, TableDescriptorBuilder, TableSet};
