//! CSV ingestion into a [`Table`]
//!
//! The header row names the columns. Columns declared categorical keep their
//! raw text, surrounding whitespace included; every other column is trimmed
//! and parsed as an integer, then a float, falling back to text. Empty cells
//! become `Null`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabenc_core::{Column, ColumnType, EncodingError, Row, Schema, Table, Value};
use tracing::{debug, info};

use crate::errors::Result;

/// Load a CSV file into a table
pub fn load_csv<P: AsRef<Path>>(path: P, categorical: &[String]) -> Result<Table> {
    info!("Loading table from: {}", path.as_ref().display());
    let file = File::open(path.as_ref())?;
    read_csv(file, categorical)
}

/// Read CSV text from any reader into a table
pub fn read_csv<R: Read>(reader: R, categorical: &[String]) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    if let Some(missing) = categorical.iter().find(|name| !headers.contains(name)) {
        return Err(EncodingError::UnknownColumn(missing.clone()).into());
    }

    let columns: Vec<Column> = headers
        .iter()
        .map(|name| {
            if categorical.contains(name) {
                Column::categorical(name.as_str())
            } else {
                Column::numeric(name.as_str())
            }
        })
        .collect();
    let schema = Schema::new(columns)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        // unequal record lengths are rejected by the reader itself
        let record = record?;
        let values: Vec<Value> = record
            .iter()
            .zip(schema.columns())
            .map(|(cell, column)| parse_cell(cell, column.kind))
            .collect();
        rows.push(Row::from(values));
    }

    debug!("Read {} rows x {} columns", rows.len(), schema.len());
    Ok(Table::new(schema, rows)?)
}

/// Interpret one raw cell according to its column's declared type
pub fn parse_cell(cell: &str, kind: ColumnType) -> Value {
    match kind {
        ColumnType::Categorical if cell.is_empty() => Value::Null,
        ColumnType::Categorical => Value::Text(cell.to_string()),
        ColumnType::Numeric => {
            let cell = cell.trim();
            if cell.is_empty() {
                Value::Null
            } else if let Ok(i) = cell.parse::<i64>() {
                Value::Int(i)
            } else if let Ok(x) = cell.parse::<f64>() {
                Value::Float(x)
            } else {
                Value::Text(cell.to_string())
            }
        }
    }
}
