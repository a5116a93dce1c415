//! Framework configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds used by the built-in intents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Maximum ratio of unique values to rows for a column to be categorical
    pub categorical_threshold: f64,
    /// Maximum number of unique values for a column to be categorical
    pub max_categorical_unique: usize,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: 0.1,
            max_categorical_unique: 30,
        }
    }
}

impl IntentConfig {
    /// Create a configuration with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set categorical unique-ratio threshold
    pub fn with_categorical_threshold(mut self, threshold: f64) -> Self {
        self.categorical_threshold = threshold;
        self
    }

    /// Set max categorical unique values
    pub fn with_max_categorical_unique(mut self, max: usize) -> Self {
        self.max_categorical_unique = max;
        self
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeshadowConfig {
    /// Built-in intent thresholds
    pub intents: IntentConfig,
}

impl ForeshadowConfig {
    /// Parse from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
