//! tabenc CLI
//!
//! Turns a CSV table into train/test observation matrices and target vectors.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tabenc_pipeline::{run, ConfigOverrides, PipelineConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tabenc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "One-hot encode a table and assemble train/test matrices", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV path (header row required)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for matrices and hashes
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target column
    #[arg(short, long)]
    target: Option<String>,

    /// Columns to one-hot encode (comma-separated)
    #[arg(long, value_delimiter = ',')]
    encode: Option<Vec<String>>,

    /// Additional columns to read as text (comma-separated)
    #[arg(long, value_delimiter = ',')]
    categorical: Option<Vec<String>>,

    /// Keep only these columns, in this order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Column selecting the held-out rows
    #[arg(long)]
    holdout_column: Option<String>,

    /// Value of the holdout column marking held-out rows
    #[arg(long)]
    holdout_value: Option<String>,

    /// Row count at which encoding switches to parallel emission
    #[arg(long)]
    parallel_threshold: Option<usize>,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config =
        PipelineConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    ConfigOverrides {
        input: args.input,
        output_dir: args.output,
        target: args.target,
        encode: args.encode,
        categorical: args.categorical,
        columns: args.columns,
        holdout_column: args.holdout_column,
        holdout_value: args.holdout_value,
        parallel_threshold: args.parallel_threshold,
    }
    .apply(&mut config);

    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!("tabenc v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════");
    info!("  Input: {}", config.input.display());
    info!("  Target: {}", config.target);
    info!("  Encode: {:?}", config.encode);
    match &config.holdout {
        Some(h) => info!("  Holdout: {} = {}", h.column, h.value),
        None => info!("  Holdout: none"),
    }

    let report = run(&config).context("Pipeline failed")?;

    info!("═══════════════════════════════════════════");
    info!("✓ Preparation completed successfully");
    info!("  Encoded columns: {}", report.encoded_columns);
    for split in &report.splits {
        info!("  {}: {} x {}", split.name, split.rows, split.cols);
    }
    for artifact in &report.artifacts {
        info!("  {} ({})", artifact.path.display(), artifact.hash);
    }

    Ok(())
}
