//! Runtime configuration module.
//!
//! The command line covers everything about *what* to produce. This file
//! covers the resource limits of the run, which are fixed before the first
//! iteration starts and never change while it runs.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_buffer_size = 52428800  # Encoded output capacity in bytes (50 MiB)
//! max_dimension = 8192           # Largest output width or height in pixels
//! ```
//!
//! Pass the file with `--config path/to/imgresize.toml`. Without it the
//! stock defaults apply. Unknown keys are rejected to catch typos early.

use crate::imaging::rust_backend::DEFAULT_MAX_DIMENSION;
use crate::transform::DEFAULT_OUTPUT_BUFFER_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest `max_dimension` accepted; matches common encoder limits.
const MAX_DIMENSION_CEILING: u32 = 65_535;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resource limits for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Fixed capacity of the encoded-output buffer, in bytes.
    pub output_buffer_size: usize,
    /// Largest output width or height the engine will produce.
    pub max_dimension: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            output_buffer_size: DEFAULT_OUTPUT_BUFFER_SIZE,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_buffer_size == 0 {
            return Err(ConfigError::Validation(
                "output_buffer_size must be greater than 0".into(),
            ));
        }
        if self.max_dimension == 0 || self.max_dimension > MAX_DIMENSION_CEILING {
            return Err(ConfigError::Validation(format!(
                "max_dimension must be 1-{MAX_DIMENSION_CEILING}, got {}",
                self.max_dimension
            )));
        }
        Ok(())
    }
}

/// Parse and validate a config from TOML text.
pub fn parse_config(content: &str) -> Result<ResizeConfig, ConfigError> {
    let config: ResizeConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or stock defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ResizeConfig, ConfigError> {
    match path {
        Some(path) => parse_config(&fs::read_to_string(path)?),
        None => Ok(ResizeConfig::default()),
    }
}

/// A documented stock config with every option at its default.
pub fn stock_config_toml() -> String {
    let defaults = ResizeConfig::default();
    format!(
        "# imgresize configuration\n\
         # All options are optional; the values below are the defaults.\n\
         \n\
         # Capacity of the encoded-output buffer in bytes. Output that does not\n\
         # fit fails the run instead of growing the buffer.\n\
         output_buffer_size = {}\n\
         \n\
         # Largest output width or height in pixels.\n\
         max_dimension = {}\n",
        defaults.output_buffer_size, defaults.max_dimension
    )
}
