//! End-to-end preparation: load, encode once, split, assemble, persist

use serde::Serialize;
use tabenc_core::{
    assemble, CategoricalEncoder, EncodedTable, ObservationMatrix, RowSubset, Table, TargetVector,
};
use tracing::{info, instrument, warn};

use crate::config::PipelineConfig;
use crate::errors::{PipelineError, Result};
use crate::loader::{load_csv, parse_cell};
use crate::output::{write_artifact, ArtifactRecord, EncodingArtifact, SplitArtifact};

pub const TRAIN_SPLIT: &str = "train";
pub const TEST_SPLIT: &str = "test";

/// An assembled split
#[derive(Debug, Clone)]
pub struct SplitData {
    pub name: String,
    pub observations: ObservationMatrix,
    pub targets: TargetVector,
}

/// The encoded table and every split assembled from it
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub encoded: EncodedTable,
    pub splits: Vec<SplitData>,
}

impl PreparedData {
    pub fn split(&self, name: &str) -> Option<&SplitData> {
        self.splits.iter().find(|s| s.name == name)
    }
}

/// Shape of one split, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

/// Outcome of a full pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub encoded_columns: usize,
    pub splits: Vec<SplitSummary>,
    pub artifacts: Vec<ArtifactRecord>,
}

/// Encode `table` and assemble its splits in memory.
///
/// The whole table is encoded before the holdout split is taken, so train
/// and test share one column layout. The encoder therefore also sees the
/// categories that only occur in held-out rows.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn prepare(config: &PipelineConfig, table: Table) -> Result<PreparedData> {
    let table = match &config.columns {
        Some(columns) => table.project(columns)?,
        None => table,
    };

    let encoder = CategoricalEncoder::new(config.encoder.clone());
    let encoded = encoder.encode(&table, &config.encode)?;
    let splits = assemble_splits(config, encoded.table())?;

    check_compatible(&splits)?;

    Ok(PreparedData { encoded, splits })
}

/// Partition the encoded table on the holdout predicate and assemble each split
fn assemble_splits(config: &PipelineConfig, encoded_table: &Table) -> Result<Vec<SplitData>> {
    let subsets: Vec<(&str, RowSubset<'_>)> = match &config.holdout {
        Some(holdout) => {
            let position = encoded_table.schema().require(&holdout.column)?;
            let kind = encoded_table.schema().columns()[position].kind;
            let held_out = parse_cell(&holdout.value, kind);
            info!("Holding out rows where {} = {}", holdout.column, held_out);

            let (test, train) = encoded_table.partition_on(&holdout.column, |v| *v == held_out)?;
            vec![(TRAIN_SPLIT, train), (TEST_SPLIT, test)]
        }
        None => vec![(TRAIN_SPLIT, encoded_table.all_rows())],
    };

    let mut splits = Vec::with_capacity(subsets.len());
    for (name, rows) in &subsets {
        if rows.is_empty() {
            warn!("Split '{}' selected no rows", name);
        }
        let (observations, targets) =
            assemble(rows, &config.target).map_err(|source| PipelineError::Split {
                split: name.to_string(),
                source,
            })?;
        check_finite(name, rows, &observations, &targets)?;
        info!(
            "Split '{}': {} rows x {} features",
            name,
            observations.rows(),
            observations.cols()
        );
        splits.push(SplitData {
            name: name.to_string(),
            observations,
            targets,
        });
    }

    Ok(splits)
}

/// JSON has no encoding for NaN or infinities, so they never reach an artifact
fn check_finite(
    split: &str,
    rows: &RowSubset<'_>,
    observations: &ObservationMatrix,
    targets: &TargetVector,
) -> Result<()> {
    let non_finite = |idx: usize, column: &str| PipelineError::NonFiniteValue {
        split: split.to_string(),
        column: column.to_string(),
        row: rows.table_index(idx).unwrap_or(idx),
    };

    for (idx, values) in observations.iter_rows().enumerate() {
        if let Some(col) = values.iter().position(|x| !x.is_finite()) {
            return Err(non_finite(idx, &observations.column_names()[col]));
        }
        if !targets.values[idx].is_finite() {
            return Err(non_finite(idx, &targets.name));
        }
    }
    Ok(())
}

/// Every split must expose the same feature columns in the same order
fn check_compatible(splits: &[SplitData]) -> Result<()> {
    let Some(first) = splits.first() else {
        return Ok(());
    };
    for other in &splits[1..] {
        if other.observations.column_names() != first.observations.column_names() {
            return Err(PipelineError::IncompatibleSplits {
                train: first.observations.cols(),
                test: other.observations.cols(),
            });
        }
    }
    Ok(())
}

/// Run the pipeline described by `config` and write its artifacts
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;

    let table = load_csv(&config.input, &config.text_columns())?;
    info!(
        "Loaded {} rows with {} columns",
        table.len(),
        table.schema().len()
    );

    let prepared = prepare(config, table)?;

    std::fs::create_dir_all(&config.output_dir)?;

    let mut artifacts = Vec::with_capacity(prepared.splits.len() + 1);
    artifacts.push(write_artifact(
        &config.output_dir,
        "encoding",
        &EncodingArtifact::new(&prepared.encoded),
    )?);
    for split in &prepared.splits {
        let artifact = SplitArtifact::new(&split.name, &split.observations, &split.targets);
        artifacts.push(write_artifact(&config.output_dir, &split.name, &artifact)?);
    }

    Ok(PipelineReport {
        encoded_columns: prepared.encoded.table().schema().len(),
        splits: prepared
            .splits
            .iter()
            .map(|s| SplitSummary {
                name: s.name.clone(),
                rows: s.observations.rows(),
                cols: s.observations.cols(),
            })
            .collect(),
        artifacts,
    })
}
