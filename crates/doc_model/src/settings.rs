//! Content settings
//!
//! Behavior switches for container operations, loadable from JSON the same
//! way the application settings are.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Tunable behavior of the content containers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContentSettings {
    /// Clone a table whose extracted text is empty as an empty paragraph
    /// instead of copying the table. Kept on by default for compatibility
    /// with documents produced by the legacy editor.
    pub clone_empty_table_as_paragraph: bool,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            clone_empty_table_as_paragraph: true,
        }
    }
}

impl ContentSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse settings from JSON, falling back to defaults on bad input
    pub fn from_json_or_default(content: &str) -> Self {
        match Self::from_json(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to parse content settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Serialize settings as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
