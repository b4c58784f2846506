//! Observation matrix and target vector assembly
//!
//! Projects a row subset into a dense row-major `f64` matrix of every
//! non-target column, plus the target column as a separate vector. Row `i`
//! of both outputs describes input row `i`. Coercion failures report the
//! row's position in the parent table, not in the subset.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::errors::{EncodingError, Result};
use crate::table::{RowSubset, Table, Value};

/// Convert a stored value to `f64`.
///
/// `Int` and `Float` pass through, `Bool` maps to 1/0, and `Text` is trimmed
/// and parsed. `Null` and unparsable text are not numbers. This is the only
/// place values become floats; `column` and `row` locate the failure.
pub fn coerce_to_f64(value: &Value, column: &str, row: usize) -> Result<f64> {
    let non_numeric = || EncodingError::NonNumericValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
    };

    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(x) => Ok(*x),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => s.trim().parse::<f64>().map_err(|_| non_numeric()),
        Value::Null => Err(non_numeric()),
    }
}

/// Dense row-major matrix of observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationMatrix {
    rows: usize,
    cols: usize,
    column_names: Vec<String>,
    data: Vec<f64>,
}

impl ObservationMatrix {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Feature name of each matrix column
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).filter_map(move |r| self.row(r))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_vecs(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}

/// Target column values, aligned with the matrix rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetVector {
    pub name: String,
    pub values: Vec<f64>,
}

impl TargetVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Assemble `rows`, using the column named `target` as the target
pub fn assemble(rows: &RowSubset<'_>, target: &str) -> Result<(ObservationMatrix, TargetVector)> {
    let target_idx = rows.schema().require(target)?;
    assemble_at(rows, target_idx)
}

/// Assemble every row of `table`
pub fn assemble_table(table: &Table, target: &str) -> Result<(ObservationMatrix, TargetVector)> {
    assemble(&table.all_rows(), target)
}

/// Assemble `rows`, using the column at position `target_idx` as the target
#[instrument(skip(rows), fields(rows = rows.len()))]
pub fn assemble_at(rows: &RowSubset<'_>, target_idx: usize) -> Result<(ObservationMatrix, TargetVector)> {
    let schema = rows.schema();
    let target = schema
        .column(target_idx)
        .ok_or_else(|| EncodingError::UnknownColumn(format!("#{}", target_idx)))?;

    if rows.is_empty() {
        return Err(EncodingError::EmptyInput);
    }

    let n_rows = rows.len();
    let n_cols = schema.len() - 1;
    let column_names: Vec<String> = schema
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != target_idx)
        .map(|(_, c)| c.name.clone())
        .collect();

    let mut data = Vec::with_capacity(n_rows * n_cols);
    let mut targets = Vec::with_capacity(n_rows);

    for (table_row, row) in rows.iter_indexed() {
        for (col, value) in row.values().iter().enumerate() {
            let x = coerce_to_f64(value, &schema.columns()[col].name, table_row)?;
            if col == target_idx {
                targets.push(x);
            } else {
                data.push(x);
            }
        }
    }

    debug!("Assembled {}x{} matrix, target '{}'", n_rows, n_cols, target.name);

    Ok((
        ObservationMatrix {
            rows: n_rows,
            cols: n_cols,
            column_names,
            data,
        },
        TargetVector {
            name: target.name.clone(),
            values: targets,
        },
    ))
}
