//! Schema-first tabular data model
//!
//! A [`Table`] fixes its column list once, in a [`Schema`], and stores rows as
//! fixed-arity slices indexed by position. Column order is part of the table's
//! identity: it decides the column order of every matrix assembled from it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::{EncodingError, Result};

/// A single cell value.
///
/// Equality and hashing are exact and type-sensitive: `Int(1)` and
/// `Float(1.0)` differ, `Null` equals only `Null`, and floats compare by bit
/// pattern so that every `NaN` with the same payload is one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Indicator cell for a one-hot column
    pub fn indicator(hot: bool) -> Self {
        if hot {
            Value::Float(1.0)
        } else {
            Value::Float(0.0)
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Declared scalar type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Numeric)
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Categorical)
    }
}

/// Ordered column list with a name lookup built once at construction
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting repeated column names
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if positions.insert(column.name.clone(), idx).is_some() {
                return Err(EncodingError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Position of `name`, or `UnknownColumn`
    pub fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| EncodingError::UnknownColumn(name.to_string()))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for Schema {}

/// One value per schema column, addressed by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Box<[Value]>);

impl Row {
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.0.get(idx)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row(values.into_boxed_slice())
    }
}

/// An in-memory table: a schema plus rows in significant order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, checking every row against the schema's arity
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self> {
        let expected = schema.len();
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(EncodingError::ArityMismatch {
                row,
                expected,
                found: bad.len(),
            });
        }
        Ok(Self { schema, rows })
    }

    /// Convenience constructor from plain column and value lists
    pub fn from_values(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let schema = Schema::new(columns)?;
        Self::new(schema, rows.into_iter().map(Row::from).collect())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row, as a subset
    pub fn all_rows(&self) -> RowSubset<'_> {
        self.select(|_| true)
    }

    /// Rows matching `predicate`, in table order
    pub fn select<F>(&self, mut predicate: F) -> RowSubset<'_>
    where
        F: FnMut(&Row) -> bool,
    {
        RowSubset {
            schema: &self.schema,
            rows: self.rows.iter().enumerate().filter(|(_, r)| predicate(r)).collect(),
        }
    }

    /// Split rows into (matching, rest), both in table order
    pub fn partition<F>(&self, mut predicate: F) -> (RowSubset<'_>, RowSubset<'_>)
    where
        F: FnMut(&Row) -> bool,
    {
        let (hit, miss): (Vec<_>, Vec<_>) = self.rows.iter().enumerate().partition(|(_, r)| predicate(r));
        (
            RowSubset {
                schema: &self.schema,
                rows: hit,
            },
            RowSubset {
                schema: &self.schema,
                rows: miss,
            },
        )
    }

    /// Split rows on a predicate over one named column's value
    pub fn partition_on<F>(&self, column: &str, mut predicate: F) -> Result<(RowSubset<'_>, RowSubset<'_>)>
    where
        F: FnMut(&Value) -> bool,
    {
        let col = self.schema.require(column)?;
        Ok(self.partition(|row| predicate(&row.values()[col])))
    }

    /// New table holding only `columns`, in the order given
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table> {
        let positions = columns
            .iter()
            .map(|name| self.schema.require(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let schema = Schema::new(
            positions
                .iter()
                .map(|&p| self.schema.columns[p].clone())
                .collect(),
        )?;

        let rows = self
            .rows
            .iter()
            .map(|row| Row::from(positions.iter().map(|&p| row.0[p].clone()).collect::<Vec<_>>()))
            .collect();

        Ok(Table { schema, rows })
    }
}

/// An ordered selection of rows borrowed from one table.
///
/// All rows share the parent table's schema, so matrices assembled from
/// different subsets of the same table are column-compatible. Each row keeps
/// its position in the parent table.
#[derive(Debug, Clone)]
pub struct RowSubset<'a> {
    schema: &'a Schema,
    rows: Vec<(usize, &'a Row)>,
}

impl<'a> RowSubset<'a> {
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `idx`-th selected row
    pub fn get(&self, idx: usize) -> Option<&'a Row> {
        self.rows.get(idx).map(|(_, row)| *row)
    }

    /// Position of the `idx`-th selected row in the parent table
    pub fn table_index(&self, idx: usize) -> Option<usize> {
        self.rows.get(idx).map(|(pos, _)| *pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Row> + '_ {
        self.rows.iter().map(|(_, row)| *row)
    }

    /// Rows paired with their parent table positions
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &'a Row)> + '_ {
        self.rows.iter().copied()
    }
}
