//! Integration tests for the full CSV-to-matrices run
//!
//! Ensures the written artifacts are consistent and reproducible.

use anyhow::Result;
use serde_json::Value as Json;
use std::io::Write;
use std::path::Path;
use tabenc_pipeline::{run, HoldoutConfig, PipelineConfig, PipelineError};
use tempfile::{NamedTempFile, TempDir};

/// Adoption statistics by state and year; PR has no 2016 row
fn create_adoption_csv() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "StateId,Year,Subsidy,Married,AverageAge,AverageMonths")?;
    writeln!(file, "AL,2014,0.40,0.61,6.2,31.5")?;
    writeln!(file, "PR,2014,0.12,0.48,7.9,44.0")?;
    writeln!(file, "TX,2014,0.55,0.66,5.1,28.0")?;
    writeln!(file, "AL,2015,0.42,0.63,6.0,30.0")?;
    writeln!(file, "PR,2015,0.10,0.50,8.1,45.5")?;
    writeln!(file, "TX,2015,0.57,0.64,5.3,27.0")?;
    writeln!(file, "AL,2016,0.45,0.60,6.1,29.5")?;
    writeln!(file, "TX,2016,0.59,0.65,5.2,26.5")?;
    file.flush()?;
    Ok(file)
}

fn config_for(input: &Path, output: &Path) -> PipelineConfig {
    PipelineConfig {
        input: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        target: "AverageMonths".into(),
        encode: vec!["StateId".into()],
        holdout: Some(HoldoutConfig {
            column: "Year".into(),
            value: "2016".into(),
        }),
        ..PipelineConfig::default()
    }
}

fn read_json(path: &Path) -> Result<Json> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

#[test]
fn test_run_writes_compatible_splits() -> Result<()> {
    let csv = create_adoption_csv()?;
    let out = TempDir::new()?;
    let report = run(&config_for(csv.path(), out.path()))?;

    // StateId_0..2 + Year, Subsidy, Married, AverageAge, AverageMonths
    assert_eq!(report.encoded_columns, 8);
    assert_eq!(report.splits[0].rows, 6);
    assert_eq!(report.splits[1].rows, 2);
    assert_eq!(report.splits[0].cols, report.splits[1].cols);

    let train = read_json(&out.path().join("train.json"))?;
    let test = read_json(&out.path().join("test.json"))?;
    assert_eq!(train["feature_names"], test["feature_names"]);
    assert_eq!(test["target"], "AverageMonths");
    assert_eq!(test["targets"], serde_json::json!([29.5, 26.5]));
    assert_eq!(
        test["observations"][1],
        serde_json::json!([0.0, 0.0, 1.0, 2016.0, 0.59, 0.65, 5.2])
    );

    let encoding = read_json(&out.path().join("encoding.json"))?;
    assert_eq!(encoding["encoded"][0]["source"], "StateId");
    assert_eq!(encoding["encoded"][0]["categories"], serde_json::json!(["AL", "PR", "TX"]));

    Ok(())
}

#[test]
fn test_hash_sidecars_match() -> Result<()> {
    let csv = create_adoption_csv()?;
    let out = TempDir::new()?;
    let report = run(&config_for(csv.path(), out.path()))?;

    assert_eq!(report.artifacts.len(), 3);
    for artifact in &report.artifacts {
        let json = std::fs::read_to_string(&artifact.path)?;
        let sidecar = std::fs::read_to_string(artifact.path.with_extension("hash"))?;
        assert_eq!(sidecar, hex::encode(blake3::hash(json.as_bytes()).as_bytes()));
        assert_eq!(sidecar, artifact.hash);
    }

    Ok(())
}

#[test]
fn test_cross_run_determinism() -> Result<()> {
    let csv = create_adoption_csv()?;
    let mut hashes = Vec::new();

    for _ in 0..3 {
        let out = TempDir::new()?;
        let report = run(&config_for(csv.path(), out.path()))?;
        hashes.push(
            report
                .artifacts
                .iter()
                .map(|a| a.hash.clone())
                .collect::<Vec<_>>(),
        );
    }

    for i in 1..hashes.len() {
        assert_eq!(hashes[0], hashes[i], "run {} should match run 0", i);
    }

    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let csv = create_adoption_csv()?;
    let out = TempDir::new()?;
    let mut config = config_for(csv.path(), out.path());
    config.target.clear();

    assert!(run(&config).is_err());
    assert!(!out.path().join("train.json").exists());
    Ok(())
}

#[test]
fn test_non_finite_input_writes_nothing() -> Result<()> {
    let mut csv = NamedTempFile::new()?;
    writeln!(csv, "S,X,Y")?;
    writeln!(csv, "A,NaN,1")?;
    writeln!(csv, "B,inf,2")?;
    csv.flush()?;

    let out = TempDir::new()?;
    let config = PipelineConfig {
        input: csv.path().to_path_buf(),
        output_dir: out.path().to_path_buf(),
        target: "Y".into(),
        encode: vec!["S".into()],
        ..PipelineConfig::default()
    };

    let err = run(&config).unwrap_err();
    assert!(matches!(err, PipelineError::NonFiniteValue { row: 0, .. }));
    assert!(!out.path().join("train.json").exists());
    assert!(!out.path().join("train.hash").exists());
    Ok(())
}
