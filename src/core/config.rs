// src/core/config.rs

use crate::core::common::OxiexecError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tuning knobs for the execution operators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecConfig {
    /// Initial capacity of the sort operator's tuple buffer.
    pub sort_buffer_capacity: usize,
    /// Initial number of buckets reserved for the join hash table.
    pub hash_table_capacity: usize,
    /// Default null placement for sort keys that do not set one.
    pub nulls_first: bool,
}

/// Builder for [`ExecConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExecConfigBuilder {
    sort_buffer_capacity: Option<usize>,
    hash_table_capacity: Option<usize>,
    nulls_first: Option<bool>,
}

impl ExecConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_buffer_capacity(mut self, capacity: usize) -> Self {
        self.sort_buffer_capacity = Some(capacity);
        self
    }

    pub fn hash_table_capacity(mut self, capacity: usize) -> Self {
        self.hash_table_capacity = Some(capacity);
        self
    }

    pub fn nulls_first(mut self, nulls_first: bool) -> Self {
        self.nulls_first = Some(nulls_first);
        self
    }

    /// Builds the config, applying defaults and validating the result.
    pub fn build(self) -> Result<ExecConfig, OxiexecError> {
        let defaults = ExecConfig::default();
        let config = ExecConfig {
            sort_buffer_capacity: self.sort_buffer_capacity.unwrap_or(defaults.sort_buffer_capacity),
            hash_table_capacity: self.hash_table_capacity.unwrap_or(defaults.hash_table_capacity),
            nulls_first: self.nulls_first.unwrap_or(defaults.nulls_first),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self { sort_buffer_capacity: 1000, hash_table_capacity: 1024, nulls_first: false }
    }
}

impl ExecConfig {
    pub fn builder() -> ExecConfigBuilder {
        ExecConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<(), OxiexecError> {
        if self.sort_buffer_capacity == 0 {
            return Err(OxiexecError::Configuration(
                "sort_buffer_capacity must be greater than 0".to_string(),
            ));
        }
        if self.hash_table_capacity == 0 {
            return Err(OxiexecError::Configuration(
                "hash_table_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `OxiexecError::Configuration` if the file cannot be parsed or fails
    /// validation, and `OxiexecError::Io` for other read failures.
    pub fn load_from_file(path: &Path) -> Result<Self, OxiexecError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    OxiexecError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(OxiexecError::Io(e)),
        }
    }

    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, OxiexecError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
