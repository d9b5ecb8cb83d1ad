use crate::commands::render;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use tabula_editor::{insert_email_template, EditorView};

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Output format (json, html)
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,
}

pub fn template(args: TemplateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut view = EditorView::mount("cli", "<p></p>", config.editor.clone())?;
    insert_email_template(&mut view)?;

    let state = view.unmount();
    println!("{}", render(&state.doc, &args.format, args.pretty || config.pretty)?);

    Ok(())
}
