//! Append-only triple set and its text serializations

use std::io::{self, Write};

use oxrdf::{NamedNodeRef, Triple, TripleRef};
use oxttl::TurtleSerializer;
use serde::Deserialize;

use crate::vocab::PREFIXES;

/// Text serialization of the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Turtle,
    NTriples,
}

impl OutputFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
        }
    }
}

/// Set of triples accumulated over a conversion run.
///
/// Inserting a triple that is already present is a no-op; nothing is ever
/// removed.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    inner: oxrdf::Graph,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one triple; returns `false` if it was already present.
    pub fn insert(&mut self, triple: &Triple) -> bool {
        self.inner.insert(triple)
    }

    /// Insert triples, returning how many were new.
    pub fn extend<'a>(&mut self, triples: impl IntoIterator<Item = &'a Triple>) -> usize {
        triples.into_iter().filter(|t| self.inner.insert(*t)).count()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.inner.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.inner.contains(triple)
    }

    /// Number of distinct subjects typed `rdf:type class`.
    pub fn count_instances(&self, class: NamedNodeRef<'_>) -> usize {
        self.inner
            .subjects_for_predicate_object(oxrdf::vocab::rdf::TYPE, class)
            .count()
    }

    /// Triples ordered by subject, predicate, object so output is stable and
    /// statements about one subject are adjacent.
    fn sorted(&self) -> Vec<TripleRef<'_>> {
        let mut keyed: Vec<(String, TripleRef<'_>)> = self
            .inner
            .iter()
            .map(|t| (t.to_string(), t))
            .collect();
        keyed.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, t)| t).collect()
    }

    /// Write Turtle with the fixed prefix bindings.
    pub fn write_turtle<W: Write>(&self, writer: W) -> io::Result<W> {
        let mut serializer = TurtleSerializer::new();
        for (prefix, namespace) in PREFIXES {
            serializer = serializer
                .with_prefix(*prefix, *namespace)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        }
        let mut serializer = serializer.for_writer(writer);
        for triple in self.sorted() {
            serializer.serialize_triple(triple)?;
        }
        serializer.finish()
    }

    /// Write N-Triples, one statement per line.
    pub fn write_ntriples<W: Write>(&self, mut writer: W) -> io::Result<W> {
        for triple in self.sorted() {
            writeln!(writer, "{triple} .")?;
        }
        Ok(writer)
    }

    pub fn write<W: Write>(&self, format: OutputFormat, writer: W) -> io::Result<W> {
        match format {
            OutputFormat::Turtle => self.write_turtle(writer),
            OutputFormat::NTriples => self.write_ntriples(writer),
        }
    }

    /// Serialize into a string.
    pub fn serialize(&self, format: OutputFormat) -> io::Result<String> {
        let buf = self.write(format, Vec::new())?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
