//! # crr-codec
//!
//! Primary-key codec for CRR change sets.
//!
//! Change records carry a table's (possibly composite) primary key as a single
//! opaque text token, so that every tracked table projects the same number of
//! columns into the unioned change stream. This crate defines:
//! - [`PkCodec`]: the encode / decode seam used by change-set synthesis
//! - [`SqlValue`]: column values rendered the way SQLite's `quote()` renders them
//! - [`PkPredicate`]: the row-selecting equality predicate a token decodes to
//! - [`QuoteConcatCodec`]: the default codec, `quote(a) || '|' || quote(b)`
//!
//! ## Example
//!
//! ```rust
//! use crr_codec::{PkCodec, QuoteConcatCodec, SqlValue};
//! use crr_schema::TableDescriptor;
//!
//! let table = TableDescriptor::builder("items")
//!     .pk("owner")
//!     .pk("slot")
//!     .build()
//!     .unwrap();
//! let codec = QuoteConcatCodec::new();
//!
//! let expr = codec.encode_expr(&table.pks).unwrap();
//! assert_eq!(expr, "quote(\"owner\") || '|' || quote(\"slot\")");
//!
//! let token = codec
//!     .encode(&table.pks, &[SqlValue::text("ann"), SqlValue::Integer(3)])
//!     .unwrap();
//! assert_eq!(token, "'ann'|3");
//!
//! let predicate = codec.decode(&table.pks, &token).unwrap();
//! assert_eq!(predicate.to_sql(), "\"owner\" = 'ann' AND \"slot\" = 3");
//! ```

mod codec;
mod error;
mod predicate;
mod value;

pub use codec::{PkCodec, QuoteConcatCodec, PK_DELIMITER};
pub use error::{CodecError, Result};
pub use predicate::{PkPredicate, PkTerm};
pub use value::SqlValue;
