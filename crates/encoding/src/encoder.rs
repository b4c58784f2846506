//! One-hot expansion of categorical columns
//!
//! Encoding runs in two passes over the table. The first pass collects a
//! [`CategorySet`] per encoded column. The second emits one output row per
//! input row, fanning each encoded column out in place into indicator
//! columns named `{source}_{index}`.
//!
//! Category sets are computed once, from the whole table. Split the encoded
//! table afterwards; never encode splits independently, or they can disagree
//! on which indicator columns exist. This also means the encoder sees the
//! categories of any held-out rows.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

use crate::category::CategorySet;
use crate::errors::{EncodingError, Result};
use crate::table::{Column, Row, Schema, Table, Value};

/// Encoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Row count at or above which the emit pass runs on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 50_000,
        }
    }
}

/// Bookkeeping for one encoded source column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedColumn {
    pub source: String,
    /// Position of the source column in the input table
    pub source_position: usize,
    /// Position of the first indicator column in the output table
    pub first_output_position: usize,
    pub categories: CategorySet,
}

impl EncodedColumn {
    /// Indicator column names, in category order
    pub fn indicator_names(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.categories.len()).map(|idx| CategorySet::indicator_name(&self.source, idx))
    }
}

/// A table with its categorical columns expanded, plus the category sets
/// that produced the expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTable {
    table: Table,
    encoded: Vec<EncodedColumn>,
}

impl EncodedTable {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// Encoded columns, in original column order
    pub fn encoded_columns(&self) -> &[EncodedColumn] {
        &self.encoded
    }

    pub fn category_set(&self, source: &str) -> Option<&CategorySet> {
        self.encoded
            .iter()
            .find(|c| c.source == source)
            .map(|c| &c.categories)
    }

    /// (indicator column, category value) pairs for every encoded column
    pub fn legend(&self) -> Vec<(String, Value)> {
        self.encoded
            .iter()
            .flat_map(|col| col.indicator_names().zip(col.categories.iter().cloned()))
            .collect()
    }
}

/// One-hot encoder
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder {
    config: EncoderConfig,
}

impl CategoricalEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Expand every column named in `columns` into indicator columns.
    ///
    /// The order of `columns` does not matter and repeated names count once;
    /// the output always follows the input table's column order.
    #[instrument(skip(self, table, columns), fields(rows = table.len()))]
    pub fn encode<S: AsRef<str>>(&self, table: &Table, columns: &[S]) -> Result<EncodedTable> {
        let schema = table.schema();

        let positions = columns
            .iter()
            .map(|name| schema.require(name.as_ref()))
            .collect::<Result<BTreeSet<usize>>>()?;

        info!(
            "Encoding {} of {} columns across {} rows",
            positions.len(),
            schema.len(),
            table.len()
        );

        // plan[p] is the index into `sets` for an encoded position p
        let mut plan = vec![None; schema.len()];
        let mut sets = Vec::with_capacity(positions.len());
        for &pos in &positions {
            let set: CategorySet = table.rows().iter().map(|row| &row.values()[pos]).collect();
            debug!(
                "Column '{}': {} distinct values",
                schema.columns()[pos].name,
                set.len()
            );
            plan[pos] = Some(sets.len());
            sets.push(set);
        }

        let mut out_columns = Vec::new();
        let mut encoded = Vec::with_capacity(sets.len());
        for (pos, column) in schema.columns().iter().enumerate() {
            match plan[pos] {
                Some(k) => {
                    let categories = &sets[k];
                    encoded.push(EncodedColumn {
                        source: column.name.clone(),
                        source_position: pos,
                        first_output_position: out_columns.len(),
                        categories: categories.clone(),
                    });
                    out_columns.extend(
                        (0..categories.len())
                            .map(|idx| Column::numeric(CategorySet::indicator_name(&column.name, idx))),
                    );
                }
                None => out_columns.push(column.clone()),
            }
        }
        let out_schema = Schema::new(out_columns)?;

        let width = out_schema.len();
        let emit = |(row_idx, row): (usize, &Row)| emit_row(row_idx, row, &plan, &sets, schema, width);
        let rows = if table.len() >= self.config.parallel_threshold {
            debug!("Emitting rows in parallel");
            table
                .rows()
                .par_iter()
                .enumerate()
                .map(emit)
                .collect::<Result<Vec<Row>>>()?
        } else {
            table
                .rows()
                .iter()
                .enumerate()
                .map(emit)
                .collect::<Result<Vec<Row>>>()?
        };

        info!("Encoded table has {} columns", width);

        Ok(EncodedTable {
            table: Table::new(out_schema, rows)?,
            encoded,
        })
    }
}

fn emit_row(
    row_idx: usize,
    row: &Row,
    plan: &[Option<usize>],
    sets: &[CategorySet],
    schema: &Schema,
    width: usize,
) -> Result<Row> {
    let mut out = Vec::with_capacity(width);
    for (pos, value) in row.values().iter().enumerate() {
        match plan[pos] {
            Some(k) => {
                let set = &sets[k];
                let hot = set.index_of(value).ok_or_else(|| {
                    EncodingError::Internal(format!(
                        "value {} at row {} missing from categories of '{}'",
                        value,
                        row_idx,
                        schema.columns()[pos].name
                    ))
                })?;
                out.extend((0..set.len()).map(|idx| Value::indicator(idx == hot)));
            }
            None => out.push(value.clone()),
        }
    }
    Ok(Row::from(out))
}

/// Encode with the default configuration
pub fn encode<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<EncodedTable> {
    CategoricalEncoder::default().encode(table, columns)
}
