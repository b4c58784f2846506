//! Tabular data preparation pipeline
//!
//! Loads a CSV table, one-hot encodes its categorical columns once, splits
//! the encoded table into train and held-out rows, and assembles an
//! observation matrix and target vector per split.

pub mod config;
pub mod errors;
pub mod loader;
pub mod output;
pub mod run;

pub use config::{ConfigOverrides, HoldoutConfig, PipelineConfig};
pub use errors::PipelineError;
pub use loader::{load_csv, read_csv};
pub use run::{prepare, run, PipelineReport, PreparedData, SplitData};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
