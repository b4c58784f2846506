use tabenc_core::EncodingError;
use thiserror::Error;

/// Errors returned by the preparation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("split '{split}': {source}")]
    Split {
        split: String,
        #[source]
        source: EncodingError,
    },

    #[error("split '{split}': non-finite value in column '{column}' at row {row}")]
    NonFiniteValue {
        split: String,
        column: String,
        row: usize,
    },

    #[error("train and test matrices disagree: {train} vs {test} columns")]
    IncompatibleSplits { train: usize, test: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
