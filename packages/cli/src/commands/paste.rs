use crate::commands::render;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tabula_editor::{ClipboardData, EditorConfig, EditorView, Node, PasteOutcome};

/// Document the paste lands in when the caret is in a table cell
const CELL_DOCUMENT: &str = "<table><tr><td></td></tr></table>";
const PARAGRAPH_DOCUMENT: &str = "<p></p>";

#[derive(Debug, Args)]
pub struct PasteArgs {
    /// HTML file used as the clipboard's text/html payload
    pub file: PathBuf,

    /// Paste into a plain paragraph instead of a table cell
    #[arg(long)]
    pub outside_table: bool,

    /// Output format (json, html)
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,
}

pub fn paste(args: PasteArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let html = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;

    let (outcome, doc) = paste_html(&html, args.outside_table, &config.editor)?;

    match &outcome {
        PasteOutcome::Plugin(name) => eprintln!("{} handled by {}", "✓".green(), name.cyan()),
        PasteOutcome::Default => eprintln!("{} not handled, default paste used", "→".yellow()),
        PasteOutcome::Ignored => eprintln!("{} nothing to paste", "⚠️".yellow()),
    }

    println!("{}", render(&doc, &args.format, args.pretty || config.pretty)?);

    Ok(())
}

/// Paste `html` into a fresh document and return the outcome with the
/// resulting document
fn paste_html(html: &str, outside_table: bool, config: &EditorConfig) -> Result<(PasteOutcome, Node)> {
    let initial = if outside_table {
        PARAGRAPH_DOCUMENT
    } else {
        CELL_DOCUMENT
    };
    let mut view = EditorView::mount("cli", initial, config.clone())?;
    let outcome = view.paste(&ClipboardData::from_parts(Some(html), None))?;
    Ok((outcome, view.unmount().doc))
}
