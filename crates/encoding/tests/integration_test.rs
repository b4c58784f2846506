//! End-to-end encode, split and assemble on an adoption-style table

use anyhow::Result;
use tabenc_core::{assemble, CategoricalEncoder, Column, EncoderConfig, EncodingError, Table, Value};

/// Puerto Rico reports no 2016 data, so the held-out year sees fewer states
fn adoption_table() -> Result<Table> {
    let rows = vec![
        vec!["AL".into(), 2015.into(), 0.42.into(), 31.0.into()],
        vec!["PR".into(), 2015.into(), 0.10.into(), 44.0.into()],
        vec!["TX".into(), 2015.into(), 0.57.into(), 28.0.into()],
        vec!["AL".into(), 2016.into(), 0.45.into(), 30.0.into()],
        vec!["TX".into(), 2016.into(), 0.59.into(), 27.5.into()],
    ];
    Ok(Table::from_values(
        vec![
            Column::categorical("StateId"),
            Column::numeric("Year"),
            Column::numeric("Subsidy"),
            Column::numeric("AverageMonths"),
        ],
        rows,
    )?)
}

#[test]
fn test_encode_once_then_split() -> Result<()> {
    let table = adoption_table()?;
    let encoded = CategoricalEncoder::new(EncoderConfig::default()).encode(&table, &["StateId"])?;

    let (test, train) = encoded
        .table()
        .partition_on("Year", |v| *v == Value::Int(2016))?;

    let (x_train, y_train) = assemble(&train, "AverageMonths")?;
    let (x_test, y_test) = assemble(&test, "AverageMonths")?;

    // StateId_0..2, Year, Subsidy
    assert_eq!(x_train.shape(), (3, 5));
    assert_eq!(x_test.shape(), (2, 5));
    assert_eq!(x_train.column_names(), x_test.column_names());

    // PR's indicator exists in the test split even though no row uses it
    assert!(x_test.iter_rows().all(|r| r[1] == 0.0));

    assert_eq!(y_train.values, vec![31.0, 44.0, 28.0]);
    assert_eq!(y_test.values, vec![30.0, 27.5]);
    assert_eq!(x_test.row(1), Some(&[0.0, 0.0, 1.0, 2016.0, 0.59][..]));

    Ok(())
}

#[test]
fn test_split_then_encode_drifts() -> Result<()> {
    // Encoding the held-out year on its own loses the PR column
    let table = adoption_table()?;
    let (test_rows, _) = table.partition_on("Year", |v| *v == Value::Int(2016))?;
    let test_only = Table::from_values(
        table.schema().columns().to_vec(),
        test_rows.iter().map(|r| r.values().to_vec()).collect(),
    )?;

    let full = CategoricalEncoder::default().encode(&table, &["StateId"])?;
    let partial = CategoricalEncoder::default().encode(&test_only, &["StateId"])?;

    assert_ne!(full.table().schema().len(), partial.table().schema().len());
    Ok(())
}

#[test]
fn test_assembling_before_encoding_fails() -> Result<()> {
    let table = adoption_table()?;
    let err = assemble(&table.all_rows(), "AverageMonths").unwrap_err();

    assert_eq!(
        err,
        EncodingError::NonNumericValue {
            column: "StateId".into(),
            row: 0,
            value: "\"AL\"".into(),
        }
    );
    Ok(())
}

#[test]
fn test_legend_maps_indicators_to_states() -> Result<()> {
    let encoded = CategoricalEncoder::default().encode(&adoption_table()?, &["StateId"])?;
    let legend = encoded.legend();

    assert_eq!(legend.len(), 3);
    assert_eq!(legend[1], ("StateId_1".to_string(), Value::from("PR")));
    Ok(())
}
