use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Deepest table nesting kept when pasting
    #[arg(long, default_value = "32")]
    pub max_table_depth: usize,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mut config = Config::default();
    config.editor.max_table_depth = args.max_table_depth;

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Copy a table from a web page into table.html");
    println!("  2. Run: tabula paste table.html");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cwd(dir: &tempfile::TempDir) -> String {
        dir.path().display().to_string()
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init(
            InitArgs {
                max_table_depth: 4,
                force: false,
            },
            &cwd(&dir),
        )
        .unwrap();

        let config = Config::load(&cwd(&dir)).unwrap();
        assert_eq!(config.editor.max_table_depth, 4);
        assert_eq!(config.editor.undo_levels, 100);
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&path, r#"{ "maxTableDepth": 7 }"#).unwrap();

        let args = |force| InitArgs {
            max_table_depth: 2,
            force,
        };
        init(args(false), &cwd(&dir)).unwrap();
        assert_eq!(Config::load(&cwd(&dir)).unwrap().editor.max_table_depth, 7);

        init(args(true), &cwd(&dir)).unwrap();
        assert_eq!(Config::load(&cwd(&dir)).unwrap().editor.max_table_depth, 2);
    }
}
