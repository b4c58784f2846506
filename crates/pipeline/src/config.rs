//! Pipeline configuration
//!
//! Layered in order: built-in defaults, an optional TOML file,
//! `TABENC_`-prefixed environment variables, then CLI overrides. Nested keys
//! use `__` in the environment, e.g. `TABENC_HOLDOUT__VALUE=2016`. List keys
//! (`encode`, `categorical`, `columns`) are comma-separated.

use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabenc_core::EncoderConfig;
use tracing::debug;

use crate::errors::{PipelineError, Result};

/// Rows whose `column` equals `value` form the held-out test split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldoutConfig {
    pub column: String,
    pub value: String,
}

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input CSV path
    pub input: PathBuf,
    /// Directory receiving the JSON artifacts
    pub output_dir: PathBuf,
    /// Column extracted as the target vector
    pub target: String,
    /// Columns to one-hot encode
    pub encode: Vec<String>,
    /// Extra columns to keep as raw text on load
    pub categorical: Vec<String>,
    /// Optional column projection applied before encoding
    pub columns: Option<Vec<String>>,
    /// Held-out split; without one every row lands in `train`
    pub holdout: Option<HoldoutConfig>,
    pub encoder: EncoderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from("out/tabenc"),
            target: String::new(),
            encode: Vec::new(),
            categorical: Vec::new(),
            columns: None,
            holdout: None,
            encoder: EncoderConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from an optional TOML file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PipelineError::InvalidConfig(format!(
                    "configuration file {} not found",
                    path.display()
                )));
            }
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TABENC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("encode")
                .with_list_parse_key("categorical")
                .with_list_parse_key("columns"),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Columns read as text: everything declared categorical plus everything encoded
    pub fn text_columns(&self) -> Vec<String> {
        let mut names = self.categorical.clone();
        for name in &self.encode {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Reject configurations that cannot produce a usable split
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfig(msg));

        if self.input.as_os_str().is_empty() {
            return invalid("no input file given".into());
        }
        if self.target.is_empty() {
            return invalid("no target column given".into());
        }
        if self.encode.contains(&self.target) {
            return invalid(format!("target column '{}' cannot be encoded", self.target));
        }
        if let Some(columns) = &self.columns {
            if !columns.contains(&self.target) {
                return invalid(format!("target column '{}' is not in the projection", self.target));
            }
        }
        if let Some(holdout) = &self.holdout {
            if holdout.column.is_empty() {
                return invalid("holdout column is empty".into());
            }
            if self.encode.contains(&holdout.column) {
                return invalid(format!("holdout column '{}' cannot be encoded", holdout.column));
            }
        }
        Ok(())
    }

    /// Render the resolved configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Values given on the command line, each replacing its configured value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub target: Option<String>,
    pub encode: Option<Vec<String>>,
    pub categorical: Option<Vec<String>>,
    pub columns: Option<Vec<String>>,
    pub holdout_column: Option<String>,
    pub holdout_value: Option<String>,
    pub parallel_threshold: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut PipelineConfig) {
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(encode) = self.encode {
            config.encode = encode;
        }
        if let Some(categorical) = self.categorical {
            config.categorical = categorical;
        }
        if self.columns.is_some() {
            config.columns = self.columns;
        }
        if self.holdout_column.is_some() || self.holdout_value.is_some() {
            let current = config.holdout.take();
            let column = self
                .holdout_column
                .or_else(|| current.as_ref().map(|h| h.column.clone()))
                .unwrap_or_default();
            let value = self
                .holdout_value
                .or_else(|| current.map(|h| h.value))
                .unwrap_or_default();
            config.holdout = Some(HoldoutConfig { column, value });
        }
        if let Some(threshold) = self.parallel_threshold {
            config.encoder.parallel_threshold = threshold;
        }
    }
}
