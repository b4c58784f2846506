use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabenc_core::{assemble_table, CategoricalEncoder, Column, EncoderConfig, Table, Value};

const STATES: usize = 52;
const YEARS: i64 = 12;

fn synthetic_table(rows: usize) -> Table {
    let data = (0..rows)
        .map(|i| {
            vec![
                Value::Int((i % STATES) as i64),
                Value::Int(2005 + (i as i64 % YEARS)),
                Value::Float((i % 97) as f64 / 97.0),
                Value::Float((i % 31) as f64),
            ]
        })
        .collect();
    Table::from_values(
        vec![
            Column::categorical("StateId"),
            Column::numeric("Year"),
            Column::numeric("Subsidy"),
            Column::numeric("AverageMonths"),
        ],
        data,
    )
    .expect("valid table")
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for &rows in &[1_000usize, 100_000] {
        let table = synthetic_table(rows);
        group.throughput(Throughput::Elements(rows as u64));

        for (label, threshold) in [("sequential", usize::MAX), ("parallel", 1)] {
            let encoder = CategoricalEncoder::new(EncoderConfig {
                parallel_threshold: threshold,
            });
            group.bench_with_input(BenchmarkId::new(label, rows), &table, |b, table| {
                b.iter(|| encoder.encode(black_box(table), &["StateId"]).expect("encode"))
            });
        }
    }
    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let encoded = CategoricalEncoder::default()
        .encode(&synthetic_table(100_000), &["StateId"])
        .expect("encode");

    c.bench_function("assemble_100k", |b| {
        b.iter(|| assemble_table(black_box(encoded.table()), "AverageMonths").expect("assemble"))
    });
}

criterion_group!(benches, bench_encode, bench_assemble);
criterion_main!(benches);
