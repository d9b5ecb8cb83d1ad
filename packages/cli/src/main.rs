mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    convert, init, paste, template, ConvertArgs, InitArgs, PasteArgs, TemplateArgs,
};
use tracing_subscriber::EnvFilter;

/// Tabula CLI - paste HTML tables into rich-text documents
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a tabula.config.json
    Init(InitArgs),

    /// Convert the first table of an HTML file to a document table
    Convert(ConvertArgs),

    /// Paste an HTML file into a table cell and print the document
    Paste(PasteArgs),

    /// Print the email layout template as a document
    Template(TemplateArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Convert(args) => convert(args, &cwd),
        Command::Paste(args) => paste(args, &cwd),
        Command::Template(args) => template(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
