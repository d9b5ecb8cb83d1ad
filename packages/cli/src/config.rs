use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tabula_editor::EditorConfig;

pub const DEFAULT_CONFIG_NAME: &str = "tabula.config.json";

/// Tabula configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Editor options, at the top level of the file
    #[serde(flatten)]
    pub editor: EditorConfig,

    /// Indent HTML output
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }
}
