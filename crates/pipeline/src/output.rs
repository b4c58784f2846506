//! Canonical JSON artifacts with BLAKE3 sidecars
//!
//! Object keys are sorted recursively and the output is pretty-printed with a
//! fixed indent, so identical inputs produce byte-identical files and hashes.

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tabenc_core::{EncodedTable, ObservationMatrix, TargetVector};
use tracing::info;

use crate::errors::{PipelineError, Result};

/// Rebuild every object in `value` with its keys in ascending order
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Array(items) => items.into_iter().map(sort_keys).collect(),
        Value::Object(fields) => fields
            .into_iter()
            .map(|(key, field)| (key, sort_keys(field)))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect(),
        scalar => scalar,
    }
}

/// Serialize `value` as canonical JSON
pub fn canonical_json_string<T: Serialize>(value: &T) -> Result<String> {
    let sorted = sort_keys(serde_json::to_value(value)?);
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    sorted.serialize(&mut serializer)?;
    String::from_utf8(buffer)
        .map_err(|err| PipelineError::Serialization(serde::ser::Error::custom(err)))
}

/// A written artifact and its digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    pub hash: String,
}

/// Write `{stem}.json` and `{stem}.hash` (hex BLAKE3 of the JSON) into `dir`
pub fn write_artifact<T: Serialize>(dir: &Path, stem: &str, value: &T) -> Result<ArtifactRecord> {
    let json = canonical_json_string(value)?;
    let hash = hex::encode(blake3::hash(json.as_bytes()).as_bytes());

    let path = dir.join(format!("{}.json", stem));
    std::fs::write(&path, &json)?;
    std::fs::write(dir.join(format!("{}.hash", stem)), &hash)?;

    info!("Wrote {} ({})", path.display(), hash);
    Ok(ArtifactRecord { path, hash })
}

/// One assembled split as handed to a learner
#[derive(Debug, Serialize)]
pub struct SplitArtifact<'a> {
    pub split: &'a str,
    pub target: &'a str,
    pub feature_names: &'a [String],
    pub observations: Vec<Vec<f64>>,
    pub targets: &'a [f64],
}

impl<'a> SplitArtifact<'a> {
    pub fn new(split: &'a str, observations: &'a ObservationMatrix, targets: &'a TargetVector) -> Self {
        Self {
            split,
            target: &targets.name,
            feature_names: observations.column_names(),
            observations: observations.to_vecs(),
            targets: &targets.values,
        }
    }
}

/// Column layout and category legend of an encoded table
#[derive(Debug, Serialize)]
pub struct EncodingArtifact<'a> {
    pub columns: Vec<&'a str>,
    pub rows: usize,
    pub encoded: &'a [tabenc_core::EncodedColumn],
}

impl<'a> EncodingArtifact<'a> {
    pub fn new(encoded: &'a EncodedTable) -> Self {
        Self {
            columns: encoded.table().schema().names().collect(),
            rows: encoded.table().len(),
            encoded: encoded.encoded_columns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_sorted_recursively() {
        let value = json!({"b": 1, "a": {"d": [{"z": 0, "y": 1}], "c": 2}});
        let text = canonical_json_string(&value).unwrap();

        let a = text.find("\"a\"").unwrap();
        let b = text.find("\"b\"").unwrap();
        let y = text.find("\"y\"").unwrap();
        let z = text.find("\"z\"").unwrap();
        assert!(a < b);
        assert!(y < z);
    }

    #[test]
    fn test_non_ascii_text_is_kept() {
        let text = canonical_json_string(&json!({"category": "Señora", "index": 0})).unwrap();
        assert!(text.contains("\"Señora\""));
        assert!(text.starts_with("{\n  \"category\""));
    }

    #[test]
    fn test_write_artifact_hash_matches() {
        let dir = tempfile::tempdir().unwrap();
        let record = write_artifact(dir.path(), "sample", &json!({"x": [1.0, 2.0]})).unwrap();

        let written = std::fs::read_to_string(&record.path).unwrap();
        let sidecar = std::fs::read_to_string(dir.path().join("sample.hash")).unwrap();
        assert_eq!(sidecar, record.hash);
        assert_eq!(record.hash, hex::encode(blake3::hash(written.as_bytes()).as_bytes()));
    }
}
