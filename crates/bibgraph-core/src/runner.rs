//! Conversion driver: table rows → mapper → shared graph → output file

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde::Serialize;

use crate::error::MappingError;
use crate::graph::{Graph, OutputFormat};
use crate::mapper::{RowMapper, RowOutcome};
use crate::progress::{fmt_num, ProgressContext};
use crate::role::RoleMapping;
use crate::table::Table;
use crate::vocab::Vocabulary;

/// Progress update interval (rows)
const UPDATE_INTERVAL: usize = 500;

/// Runtime configuration for one conversion
#[derive(Debug, Clone)]
pub struct Config {
    /// Input CSV file
    pub input: PathBuf,
    /// Output graph file
    pub output: PathBuf,
    pub format: OutputFormat,
    /// CSV field delimiter
    pub delimiter: u8,
    /// Explicit `Role=Column` assignments, applied after suggestions
    pub assignments: Vec<String>,
    /// Guess roles from header names before applying assignments
    pub suggest: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.csv"),
            output: PathBuf::from("transformed.ttl"),
            format: OutputFormat::Turtle,
            delimiter: b',',
            assignments: Vec::new(),
            suggest: true,
        }
    }
}

/// Conversion summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total_rows: usize,
    /// Rows that passed the admissibility gate and converted without error
    pub processed_rows: usize,
    /// Rows without DOI or author IDs
    pub skipped_rows: usize,
    pub failed_rows: usize,
    /// Items left out of converted rows (e.g. keywords with no usable identifier)
    pub warnings: usize,
    /// Distinct triples in the graph
    pub triples: usize,
    pub publications: usize,
    pub authors: usize,
    pub keywords: usize,
    pub sources: usize,
    /// `Row <n>: <reason>` per warning and failure, in row order
    pub errors: Vec<String>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Graph plus summary of a finished conversion.
#[derive(Debug)]
pub struct Conversion {
    pub graph: Graph,
    pub summary: Summary,
}

/// Combine header-based suggestions with explicit assignments.
pub fn build_mapping(
    headers: &[String],
    assignments: &[String],
    suggest: bool,
) -> Result<RoleMapping, MappingError> {
    let mut mapping = if suggest {
        RoleMapping::suggest(headers)
    } else {
        RoleMapping::default()
    };
    for assignment in assignments {
        let (role, column) = RoleMapping::parse_assignment(assignment)?;
        mapping.assign(headers, role, column.as_deref())?;
    }
    Ok(mapping)
}

/// Feed every row through the mapper into one graph.
///
/// Row failures are recorded and never stop the loop; triples a failed row
/// produced before its error stay in the graph.
pub fn convert(
    table: &Table,
    mapping: &RoleMapping,
    vocab: &Vocabulary,
    pb: &ProgressBar,
) -> Conversion {
    let start = Instant::now();
    let mapper = RowMapper::new(vocab, mapping);
    if !mapper.can_admit() {
        log::warn!("DOI and Author(s) ID are not both mapped; every row will be skipped");
    }

    let mut graph = Graph::new();
    let mut summary = Summary {
        total_rows: table.len(),
        ..Default::default()
    };

    for (i, row) in table.rows().iter().enumerate() {
        let outcome = mapper.map_row(row);
        graph.extend(outcome.triples());
        for warning in outcome.warnings() {
            let message = format!("Row {}: {warning}", row.number());
            log::warn!("{message}");
            summary.warnings += 1;
            summary.errors.push(message);
        }
        match outcome {
            RowOutcome::Skipped => {
                summary.skipped_rows += 1;
                log::debug!("Row {}: skipped (no DOI or author IDs)", row.number());
            }
            RowOutcome::Processed { .. } => summary.processed_rows += 1,
            RowOutcome::Failed { triples, error, .. } => {
                summary.failed_rows += 1;
                let message = format!("Row {}: {error}", row.number());
                log::warn!("{message} ({} partial triples kept)", triples.len());
                summary.errors.push(message);
            }
        }

        if (i + 1) % UPDATE_INTERVAL == 0 {
            pb.set_position((i + 1) as u64);
            pb.set_message(format!("{} triples", fmt_num(graph.len())));
        }
    }
    pb.set_position(table.len() as u64);
    pb.finish_and_clear();

    summary.triples = graph.len();
    summary.publications = [&vocab.article, &vocab.book_chapter, &vocab.review]
        .into_iter()
        .map(|class| graph.count_instances(class.as_ref()))
        .sum();
    summary.authors = graph.count_instances(vocab.person.as_ref());
    summary.keywords = graph.count_instances(vocab.concept.as_ref());
    summary.sources = graph.count_instances(vocab.journal.as_ref());
    summary.elapsed = start.elapsed();

    Conversion { graph, summary }
}

/// Run a conversion from file to file.
pub fn run(config: &Config, progress: &ProgressContext) -> Result<Summary> {
    let table = Table::from_path(&config.input, config.delimiter)?;
    log::info!(
        "Loaded {} rows from {}",
        fmt_num(table.len()),
        config.input.display()
    );

    let mapping = build_mapping(table.headers(), &config.assignments, config.suggest)
        .context("Invalid column mapping")?;
    for (role, column) in mapping.iter() {
        log::info!("  {role:<18} <- {}", column.name);
    }

    let vocab = Vocabulary::new();
    let pb = progress.rows_bar("convert", table.len());
    let Conversion { graph, summary } = convert(&table, &mapping, &vocab, &pb);

    let bytes = crate::output::write_graph(&graph, config.format, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    log::info!("=== Conversion Summary ===");
    log::info!(
        "Rows: {}/{} processed ({} skipped, {} failed)",
        fmt_num(summary.processed_rows),
        fmt_num(summary.total_rows),
        fmt_num(summary.skipped_rows),
        fmt_num(summary.failed_rows)
    );
    if summary.warnings > 0 {
        log::info!("Warnings: {}", fmt_num(summary.warnings));
    }
    log::info!("Triples: {}", fmt_num(summary.triples));
    log::info!(
        "Output: {} ({} bytes)",
        config.output.display(),
        fmt_num(bytes as usize)
    );
    log::info!("Time: {:.2}s", summary.elapsed.as_secs_f64());

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::table::Row;
    use oxrdf::{Triple, TripleRef};

    fn table(rows: &[[&str; 5]]) -> Table {
        let headers = ["DOI", "Author(s) ID", "Title", "Year", "Cited by"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, cells)| Row::new(i + 2, *cells))
            .collect();
        Table::new(headers, rows)
    }

    fn run_table(table: &Table) -> Conversion {
        let mapping = build_mapping(table.headers(), &[], true).unwrap();
        convert(table, &mapping, &Vocabulary::new(), &ProgressBar::hidden())
    }

    #[test]
    fn single_row() {
        let t = table(&[["10.1/AB", "123", "Test", "2020", "5"]]);
        let Conversion { graph, summary } = run_table(&t);
        assert_eq!(summary.processed_rows, 1);
        assert!(summary.errors.is_empty());
        assert_eq!(summary.publications, 1);
        assert_eq!(summary.authors, 1);
        // type, title, doi, created, cited-by; person, sameAs; relatedBy, type, relates, rank
        assert_eq!(graph.len(), 11);
        assert_eq!(summary.triples, 11);
    }

    #[test]
    fn failed_row_does_not_stop_run() {
        let t = table(&[
            ["10.1/a", "1", "Good", "2020", "5"],
            ["10.1/b", "2", "Bad", "2021", "N/A"],
            ["", "3", "Skipped", "", ""],
        ]);
        let Conversion { graph, summary } = run_table(&t);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.processed_rows, 1);
        assert_eq!(summary.failed_rows, 1);
        assert_eq!(summary.skipped_rows, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("Row 3: "));
        assert!(summary.errors[0].contains("N/A"));
        // partial triples of the failed row stay
        assert_eq!(summary.publications, 2);
        assert_eq!(summary.authors, 1);
        assert!(graph.len() > 11);
    }

    #[test]
    fn unusable_keywords_are_listed_with_row() {
        let headers: Vec<String> = ["DOI", "Author(s) ID", "Author Keywords"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            Row::new(2, ["10.1/a", "1", "Graphs"]),
            Row::new(3, ["10.1/b", "2", "Графы; Graphs"]),
        ];
        let t = Table::new(headers, rows);
        let Conversion { summary, .. } = run_table(&t);
        assert_eq!(summary.processed_rows, 2);
        assert_eq!(summary.failed_rows, 0);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.keywords, 1);
        assert_eq!(
            summary.errors,
            vec!["Row 3: Author Keywords \"Графы\" does not yield a usable identifier; skipped"]
        );
    }

    #[test]
    fn skipped_rows_emit_nothing() {
        let t = table(&[["", "1", "T", "2020", "x"], ["10.1/x", "", "T", "2020", "x"]]);
        let Conversion { graph, summary } = run_table(&t);
        assert!(graph.is_empty());
        assert_eq!(summary.skipped_rows, 2);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn shared_entities_collapse_across_rows() {
        let t = table(&[
            ["10.1/a", "7;8", "A", "", ""],
            ["10.1/b", "8", "B", "", ""],
        ]);
        let Conversion { summary, .. } = run_table(&t);
        assert_eq!(summary.publications, 2);
        assert_eq!(summary.authors, 2);
    }

    #[test]
    fn rerun_is_identical() {
        let t = table(&[
            ["10.1/a", "1;2", "A", "2020", "3"],
            ["10.1/b", "2", "B", "2021", "N/A"],
        ]);
        let first = run_table(&t).graph;
        let second = run_table(&t).graph;
        assert_eq!(first.len(), second.len());
        assert!(first.iter().all(|t| second.iter().any(|u| u == t)));

        let owned: Vec<Triple> = second.iter().map(TripleRef::into_owned).collect();
        let mut twice = first.clone();
        assert_eq!(twice.extend(&owned), 0);
        assert_eq!(twice.len(), first.len());
        assert_eq!(
            first.serialize(OutputFormat::Turtle).unwrap(),
            second.serialize(OutputFormat::Turtle).unwrap()
        );
    }

    #[test]
    fn explicit_assignment_overrides_suggestion() {
        let headers: Vec<String> = ["DOI", "Other DOI", "Author(s) ID"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mapping =
            build_mapping(&headers, &["DOI=Other DOI".to_string()], true).unwrap();
        assert_eq!(mapping.column(Role::Doi).unwrap().name, "Other DOI");
    }

    #[test]
    fn assignment_can_ignore_role() {
        let headers: Vec<String> = ["DOI", "Link"].iter().map(|s| s.to_string()).collect();
        let mapping = build_mapping(&headers, &["Link=".to_string()], true).unwrap();
        assert!(mapping.column(Role::Link).is_none());
    }

    #[test]
    fn unknown_column_is_rejected() {
        let headers: Vec<String> = vec!["DOI".to_string()];
        let err = build_mapping(&headers, &["Title=Nope".to_string()], false).unwrap_err();
        assert!(matches!(err, MappingError::UnknownColumn { .. }));
    }
}
