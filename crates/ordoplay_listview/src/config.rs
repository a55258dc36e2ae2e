// SPDX-License-Identifier: MIT OR Apache-2.0
//! List view style configuration.
//!
//! Styles are stored as RON and describe the listed items, their indents, the
//! behaviour flags and the initial selection. Every field is optional so a style
//! only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current style format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Style loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid RON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Style written by a newer format
    #[error("Style version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },
}

/// An item to list, looked up by name in the item container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    /// Item name
    pub name: String,
    /// Hierarchy depth, left unchanged when absent
    #[serde(default)]
    pub indent: Option<i32>,
}

impl ConfigItem {
    /// Create an entry without an indent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indent: None,
        }
    }

    /// Builder-style indent
    pub fn with_indent(mut self, indent: i32) -> Self {
        self.indent = Some(indent);
        self
    }
}

/// List view style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListViewConfig {
    /// Style format version
    pub version: u32,
    /// Items appended in order
    #[serde(default)]
    pub items: Vec<ConfigItem>,
    /// Highlight mode name: `never`, `focus` or `always`
    #[serde(default)]
    pub highlight: Option<String>,
    /// Allow multiple selected items
    #[serde(default)]
    pub multiselect: Option<bool>,
    /// Interpret indents as a collapsible hierarchy
    #[serde(default)]
    pub hierarchy: Option<bool>,
    /// Clear the selection when focus is lost
    #[serde(default)]
    pub clear_selection_on_defocus: Option<bool>,
    /// Double-click interval in seconds
    #[serde(default)]
    pub double_click_interval: Option<f32>,
    /// Indices added to the selection after the items are listed
    #[serde(default)]
    pub selections: Vec<usize>,
}

impl Default for ListViewConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            items: Vec::new(),
            highlight: None,
            multiselect: None,
            hierarchy: None,
            clear_selection_on_defocus: None,
            double_click_interval: None,
            selections: Vec::new(),
        }
    }
}

impl ListViewConfig {
    /// Parse a style from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: ListViewConfig = ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        ron::ser::to_string_pretty(self, config).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a style from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save the style to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}
