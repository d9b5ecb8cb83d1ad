use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deepest table nesting the paste converter accepts
pub const DEFAULT_MAX_TABLE_DEPTH: usize = 32;

/// Editor configuration (camelCase JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Tables nested deeper than this are skipped when pasting
    pub max_table_depth: usize,

    /// Maximum number of undo steps kept (0 = unlimited)
    pub undo_levels: usize,

    /// Table editing options handed to the host
    pub allow_table_selection: bool,
    pub cell_min_width: u32,
    pub column_resizing: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_table_depth: DEFAULT_MAX_TABLE_DEPTH,
            undo_levels: 100,
            allow_table_selection: true,
            cell_min_width: 25,
            column_resizing: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file, defaults when it doesn't exist
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
