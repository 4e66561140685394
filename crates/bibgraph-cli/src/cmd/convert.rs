//! `bibgraph convert` - CSV export to RDF file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use bibgraph_core::{ProgressContext, Summary, fmt_num};

use crate::config::{Config, delimiter_byte};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// Output file (default from config: transformed.ttl)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output serialization
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Column assignment as "Role=Column"; "Role=" ignores the role (repeatable)
    #[arg(short, long = "map", value_name = "ROLE=COLUMN")]
    pub map: Vec<String>,

    /// Do not guess roles from header names
    #[arg(long)]
    pub no_suggest: bool,

    /// CSV field delimiter
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum Format {
    Turtle,
    Ntriples,
}

impl From<Format> for bibgraph_core::OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Turtle => bibgraph_core::OutputFormat::Turtle,
            Format::Ntriples => bibgraph_core::OutputFormat::NTriples,
        }
    }
}

/// Merge command-line flags over file configuration.
fn core_config(args: &ConvertArgs, config: &Config) -> Result<bibgraph_core::Config> {
    let delimiter = match args.delimiter {
        Some(c) => delimiter_byte(c)?,
        None => config.input.delimiter_byte()?,
    };
    Ok(bibgraph_core::Config {
        input: args.input.clone(),
        output: args
            .output
            .clone()
            .unwrap_or_else(|| config.output.default_file.clone()),
        format: args.format.map(Into::into).unwrap_or(config.output.format),
        delimiter,
        assignments: args.map.clone(),
        suggest: config.mapping.suggest && !args.no_suggest,
    })
}

pub fn run(args: ConvertArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let core = core_config(&args, config)?;
    let summary = bibgraph_core::run(&core, progress)?;

    if let Some(path) = &args.report {
        let json = serde_json::to_vec_pretty(&summary)?;
        bibgraph_core::write_atomic(path, &json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        log::info!("Report: {}", path.display());
    }

    eprintln!("\n{}", summary_table(&summary));
    if !summary.errors.is_empty() {
        eprintln!(
            "\n{} failed rows, {} warnings:",
            fmt_num(summary.failed_rows),
            fmt_num(summary.warnings)
        );
        for error in &summary.errors {
            eprintln!("  {error}");
        }
    }
    Ok(())
}

fn summary_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Metric").fg(Color::Cyan),
            Cell::new("Count").fg(Color::Cyan),
        ]);

    let failed = Cell::new(fmt_num(summary.failed_rows));
    let failed = if summary.failed_rows > 0 {
        failed.fg(Color::Red)
    } else {
        failed
    };

    table.add_row(vec![Cell::new("Rows"), Cell::new(fmt_num(summary.total_rows))]);
    table.add_row(vec![
        Cell::new("Processed"),
        Cell::new(fmt_num(summary.processed_rows)).fg(Color::Green),
    ]);
    table.add_row(vec![Cell::new("Skipped"), Cell::new(fmt_num(summary.skipped_rows))]);
    table.add_row(vec![Cell::new("Failed"), failed]);
    table.add_row(vec![Cell::new("Warnings"), Cell::new(fmt_num(summary.warnings))]);
    table.add_row(vec![Cell::new("Triples"), Cell::new(fmt_num(summary.triples))]);
    table.add_row(vec![
        Cell::new("Publications"),
        Cell::new(fmt_num(summary.publications)),
    ]);
    table.add_row(vec![Cell::new("Authors"), Cell::new(fmt_num(summary.authors))]);
    table.add_row(vec![Cell::new("Keywords"), Cell::new(fmt_num(summary.keywords))]);
    table.add_row(vec![Cell::new("Sources"), Cell::new(fmt_num(summary.sources))]);
    table.add_row(vec![
        Cell::new("Time"),
        Cell::new(format!("{:.2}s", summary.elapsed.as_secs_f64())),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibgraph_core::OutputFormat;

    fn args(input: &str) -> ConvertArgs {
        ConvertArgs {
            input: PathBuf::from(input),
            output: None,
            format: None,
            map: Vec::new(),
            no_suggest: false,
            delimiter: None,
            report: None,
        }
    }

    #[test]
    fn config_defaults_apply() {
        let core = core_config(&args("in.csv"), &Config::default()).unwrap();
        assert_eq!(core.output, PathBuf::from("transformed.ttl"));
        assert_eq!(core.format, OutputFormat::Turtle);
        assert_eq!(core.delimiter, b',');
        assert!(core.suggest);
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.input.delimiter = ';';
        let cli = ConvertArgs {
            output: Some(PathBuf::from("g.nt")),
            format: Some(Format::Ntriples),
            map: vec!["Title=Name".to_string()],
            no_suggest: true,
            delimiter: Some('\t'),
            ..args("in.csv")
        };
        let core = core_config(&cli, &config).unwrap();
        assert_eq!(core.output, PathBuf::from("g.nt"));
        assert_eq!(core.format, OutputFormat::NTriples);
        assert_eq!(core.delimiter, b'\t');
        assert_eq!(core.assignments, vec!["Title=Name".to_string()]);
        assert!(!core.suggest);
    }

    #[test]
    fn config_can_disable_suggestions() {
        let mut config = Config::default();
        config.mapping.suggest = false;
        let core = core_config(&args("in.csv"), &config).unwrap();
        assert!(!core.suggest);
    }

    #[test]
    fn convert_writes_graph_and_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "DOI,Author(s) ID,Cited by\n10.1/a,1,2\n10.1/b,2,x\n").unwrap();
        let report = dir.path().join("reports").join("report.json");
        let cli = ConvertArgs {
            output: Some(dir.path().join("out.ttl")),
            report: Some(report.clone()),
            input,
            ..args("")
        };
        run(cli, &Config::default(), &ProgressContext::with_tty(false)).unwrap();

        assert!(dir.path().join("out.ttl").exists());
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&report).unwrap()).unwrap();
        assert_eq!(json["processed_rows"], 1);
        assert_eq!(json["failed_rows"], 1);
        assert_eq!(json["warnings"], 0);
        assert_eq!(json["errors"][0].as_str().unwrap().split(':').next(), Some("Row 3"));
    }
}
