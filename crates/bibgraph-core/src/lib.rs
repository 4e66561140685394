//! bibgraph core - citation exports to RDF
//!
//! Converts tabular bibliographic records (one row per publication, e.g. a
//! Scopus CSV export) into an RDF graph of publications, sources, keywords,
//! authors and authorships, serialized as Turtle or N-Triples.
//!
//! # Example
//!
//! ```ignore
//! use bibgraph_core::{Config, ProgressContext, run};
//!
//! let config = Config {
//!     input: "scopus.csv".into(),
//!     output: "scopus.ttl".into(),
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &ProgressContext::new())?;
//! println!("{} rows, {} triples", summary.processed_rows, summary.triples);
//! ```

pub mod error;
pub mod graph;
pub mod logging;
pub mod mapper;
pub mod output;
pub mod progress;
pub mod role;
pub mod runner;
pub mod slug;
pub mod table;
pub mod vocab;

// Re-exports for convenience
pub use error::{MappingError, RowError};
pub use graph::{Graph, OutputFormat};
pub use logging::init_logging;
pub use mapper::{DocumentType, RowMapper, RowOutcome};
pub use output::{write_atomic, write_graph};
pub use progress::{ProgressContext, fmt_num};
pub use role::{Column, Role, RoleMapping};
pub use runner::{Config, Conversion, Summary, build_mapping, convert, run};
pub use slug::normalize;
pub use table::{Row, Table};
pub use vocab::Vocabulary;
