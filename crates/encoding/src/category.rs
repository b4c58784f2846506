//! First-appearance ordered category sets

use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::table::Value;

/// Distinct values of one column, in order of first appearance.
///
/// Insertion is append-if-absent: a `Vec` fixes the order and a `HashMap`
/// answers membership. The order never depends on hash iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    values: Vec<Value>,
    index: HashMap<Value, usize>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` if unseen; returns its index either way
    pub fn insert(&mut self, value: &Value) -> usize {
        if let Some(&idx) = self.index.get(value) {
            return idx;
        }
        let idx = self.values.len();
        self.values.push(value.clone());
        self.index.insert(value.clone(), idx);
        idx
    }

    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Name of the indicator column for category `idx` of `source`
    pub fn indicator_name(source: &str, idx: usize) -> String {
        format!("{}_{}", source, idx)
    }
}

impl<'a> FromIterator<&'a Value> for CategorySet {
    fn from_iter<I: IntoIterator<Item = &'a Value>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl Serialize for CategorySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}
