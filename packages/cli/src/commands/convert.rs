use crate::commands::render;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tabula_editor::{Schema, TableConverter};
use tabula_schema::html::{find_first_element, parse_html};
use tracing::info;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// HTML file containing a table
    pub file: PathBuf,

    /// Output format (json, html)
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,

    /// Deepest table nesting to keep (overrides config)
    #[arg(long)]
    pub max_depth: Option<usize>,
}

pub fn convert(args: ConvertArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let html = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;

    let schema = Schema::standard()?;
    let dom = parse_html(&html);
    let table = find_first_element(&dom.document, "table")
        .ok_or_else(|| anyhow!("No <table> found in {}", args.file.display()))?;

    let max_depth = args.max_depth.unwrap_or(config.editor.max_table_depth);
    info!(file = %args.file.display(), max_depth, "converting table");

    let node = TableConverter::new(schema)
        .with_max_depth(max_depth)
        .convert(&table)
        .ok_or_else(|| anyhow!("Table in {} has no convertible rows", args.file.display()))?;

    eprintln!(
        "{} {} rows, {} nested tables",
        "✓".green(),
        node.child_count(),
        node.count(tabula_editor::NodeKind::Table) - 1
    );
    println!("{}", render(&node, &args.format, args.pretty || config.pretty)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: PathBuf) -> ConvertArgs {
        ConvertArgs {
            file,
            format: "json".to_string(),
            pretty: false,
            max_depth: None,
        }
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("table.html");
        fs::write(&file, "<table><tr><td>A</td></tr></table>").unwrap();

        assert!(convert(args(file), &dir.path().display().to_string()).is_ok());
    }

    #[test]
    fn test_convert_without_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("text.html");
        fs::write(&file, "<p>no table</p>").unwrap();

        let err = convert(args(file), &dir.path().display().to_string()).unwrap_err();
        assert!(err.to_string().contains("No <table> found"));
    }

    #[test]
    fn test_convert_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.html");
        assert!(convert(args(file), &dir.path().display().to_string()).is_err());
    }
}
