//! bibgraph - citation exports to RDF
//!
//! Converts Scopus-style CSV exports into a Turtle (or N-Triples) graph of
//! publications, authors, authorships, keywords and sources.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "bibgraph")]
#[command(about = "Convert bibliographic CSV exports into RDF graphs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./bibgraph.toml or ~/.config/bibgraph/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a CSV export into an RDF file
    Convert(cmd::convert::ConvertArgs),
    /// Show the column mapping guessed from a CSV header
    Suggest(cmd::suggest::SuggestArgs),
    /// List the roles a column can be mapped to
    Roles,
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = bibgraph_core::ProgressContext::new();

    // Logging:
    //   TTY:     quiet (warn) unless --debug; the progress bar shows activity
    //   non-TTY: info unless --debug; logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    bibgraph_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Convert(args) => cmd::convert::run(args, &config, &progress),
        Command::Suggest(args) => cmd::suggest::run(args, &config),
        Command::Roles => cmd::roles::run(),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Delimiter",
                &format!("{:?}", config.input.delimiter),
            ]);
            table.add_row(vec![
                "Output file",
                &config.output.default_file.display().to_string(),
            ]);
            table.add_row(vec![
                "Output format",
                match config.output.format {
                    bibgraph_core::OutputFormat::Turtle => "turtle",
                    bibgraph_core::OutputFormat::NTriples => "ntriples",
                },
            ]);
            table.add_row(vec![
                "Suggest mapping",
                if config.mapping.suggest { "yes" } else { "no" },
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
