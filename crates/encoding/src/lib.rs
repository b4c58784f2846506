//! Deterministic categorical encoding for tabular learning data
//!
//! Turns a mixed categorical/numeric table into a dense `f64` observation
//! matrix and an aligned target vector.
//!
//! Modules:
//! - `table`: schema-first table, rows and row subsets
//! - `category`: first-appearance ordered category sets
//! - `encoder`: one-hot expansion of categorical columns
//! - `assembler`: observation matrix / target vector projection
//! - `errors`: error taxonomy
//!
//! Encode once, then split: compute category sets on the full table and
//! partition the encoded table afterwards, so every split shares one column
//! layout.

pub mod assembler;
pub mod category;
pub mod encoder;
pub mod errors;
pub mod table;

pub use assembler::{assemble, assemble_at, assemble_table, coerce_to_f64, ObservationMatrix, TargetVector};
pub use category::CategorySet;
pub use encoder::{encode, CategoricalEncoder, EncodedColumn, EncodedTable, EncoderConfig};
pub use errors::{EncodingError, Result};
pub use table::{Column, ColumnType, Row, RowSubset, Schema, Table, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
