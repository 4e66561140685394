//! Row mapper: one table row + role mapping → graph triples
//!
//! Each row is converted independently. A row either fails the admissibility
//! gate (DOI and author IDs both mapped and present), converts fully, or fails
//! part way; in the last case the triples produced before the failure are
//! still handed back so the caller can keep them. Keywords or sources that
//! cannot be turned into identifiers are left out and reported as warnings.
//!
//! Emission order inside a row is fixed:
//! 1. publication type
//! 2. scalar properties, in [`PROPERTY_TABLE`] order
//! 3. keywords
//! 4. authors and authorships, in author-ID order

use std::sync::LazyLock;

use oxrdf::{Literal, NamedNode, Triple};
use regex::Regex;

use crate::error::RowError;
use crate::role::{Role, RoleMapping};
use crate::slug::slug;
use crate::table::Row;
use crate::vocab::{iri, Category, Vocabulary};

/// Separator for multi-valued cells (authors, names, keywords).
pub const MULTI_VALUE_SEPARATOR: char = ';';

/// Leading run of an author name outside any parenthetical, e.g. `Smith, J. ` in `Smith, J. (123)`.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^()]+").expect("invalid author name pattern"));

/// How a scalar cell becomes the object of a publication triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    /// Untyped literal holding the raw value
    Plain,
    /// `xsd:gYear` literal
    Year,
    /// `xsd:integer` literal; non-integers fail the row
    Integer,
    /// IRI reference
    Iri,
    /// Link to a source (journal) node
    Source,
}

/// Predicate of a scalar property, looked up in the run's vocabulary.
type Predicate = fn(&Vocabulary) -> &NamedNode;

/// Scalar publication properties, in emission order.
const PROPERTY_TABLE: [(Role, Encoding, Predicate); 12] = [
    (Role::Title, Encoding::Plain, |v| &v.title),
    (Role::Doi, Encoding::Plain, |v| &v.doi),
    (Role::Eid, Encoding::Plain, |v| &v.eid),
    (Role::Link, Encoding::Iri, |v| &v.url),
    (Role::Year, Encoding::Year, |v| &v.created),
    (Role::CitedBy, Encoding::Integer, |v| &v.cited_by_count),
    (Role::SourceTitle, Encoding::Source, |v| &v.is_part_of),
    (Role::Volume, Encoding::Plain, |v| &v.volume),
    (Role::Issue, Encoding::Plain, |v| &v.issue),
    (Role::ArticleNumber, Encoding::Plain, |v| &v.number),
    (Role::PageStart, Encoding::Plain, |v| &v.page_start),
    (Role::PageEnd, Encoding::Plain, |v| &v.page_end),
];

/// Publication class, decided from the free-text document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Article,
    BookChapter,
    Review,
}

impl DocumentType {
    /// Case-insensitive substring match; "book chapter" beats "review".
    /// Anything else, including a missing value, is an article.
    pub fn classify(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Article;
        };
        let value = value.to_lowercase();
        if value.contains("book chapter") {
            Self::BookChapter
        } else if value.contains("review") {
            Self::Review
        } else {
            Self::Article
        }
    }
}

/// Result of mapping a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Not admissible: DOI or author IDs unmapped or missing. Not an error.
    Skipped,
    /// Converted to the end; `warnings` name items that were left out.
    Processed {
        triples: Vec<Triple>,
        warnings: Vec<RowError>,
    },
    /// Conversion stopped at `error`; `triples` and `warnings` were produced before it.
    Failed {
        triples: Vec<Triple>,
        warnings: Vec<RowError>,
        error: RowError,
    },
}

impl RowOutcome {
    /// Triples to add to the graph, including partial output of a failed row.
    pub fn triples(&self) -> &[Triple] {
        match self {
            Self::Skipped => &[],
            Self::Processed { triples, .. } | Self::Failed { triples, .. } => triples,
        }
    }

    /// Items left out of an otherwise converted row.
    pub fn warnings(&self) -> &[RowError] {
        match self {
            Self::Skipped => &[],
            Self::Processed { warnings, .. } | Self::Failed { warnings, .. } => warnings,
        }
    }
}

/// Split a `;`-separated cell into trimmed, non-empty tokens paired with
/// their 1-based position in the unfiltered split.
///
/// Empty slots are dropped but still consume a position, so `"A1;;A2"`
/// yields `(1, "A1")` and `(3, "A2")`.
pub fn positional_tokens(value: &str) -> impl Iterator<Item = (usize, &str)> {
    value
        .split(MULTI_VALUE_SEPARATOR)
        .enumerate()
        .map(|(i, token)| (i + 1, token.trim()))
        .filter(|(_, token)| !token.is_empty())
}

/// Name part of an author entry: the first run without parentheses, trimmed.
pub fn author_name(entry: &str) -> Option<&str> {
    NAME_PATTERN
        .find(entry)
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

/// Converts rows into triples for a fixed mapping and vocabulary.
pub struct RowMapper<'a> {
    vocab: &'a Vocabulary,
    mapping: &'a RoleMapping,
}

impl<'a> RowMapper<'a> {
    pub fn new(vocab: &'a Vocabulary, mapping: &'a RoleMapping) -> Self {
        Self { vocab, mapping }
    }

    /// Whether rows can pass the admissibility gate at all with this mapping.
    pub fn can_admit(&self) -> bool {
        self.mapping.column(Role::Doi).is_some() && self.mapping.column(Role::AuthorIds).is_some()
    }

    fn value<'r>(&self, row: &'r Row, role: Role) -> Option<&'r str> {
        self.mapping.column(role).and_then(|c| row.get(c.index))
    }

    pub fn map_row(&self, row: &Row) -> RowOutcome {
        let (Some(doi), Some(author_ids)) =
            (self.value(row, Role::Doi), self.value(row, Role::AuthorIds))
        else {
            return RowOutcome::Skipped;
        };

        let mut triples = Vec::new();
        let mut warnings = Vec::new();
        match self.emit(row, doi, author_ids, &mut triples, &mut warnings) {
            Ok(()) => RowOutcome::Processed { triples, warnings },
            Err(error) => RowOutcome::Failed {
                triples,
                warnings,
                error,
            },
        }
    }

    fn emit(
        &self,
        row: &Row,
        doi: &str,
        author_ids: &str,
        out: &mut Vec<Triple>,
        warnings: &mut Vec<RowError>,
    ) -> Result<(), RowError> {
        let doi_slug = slug(doi.trim());
        if doi_slug.is_empty() {
            return Err(RowError::EmptyIdentifier {
                value: doi.to_string(),
            });
        }
        let publication = self.vocab.mint(Category::Publication, &doi_slug)?;

        let class = match DocumentType::classify(self.value(row, Role::DocumentType)) {
            DocumentType::Article => &self.vocab.article,
            DocumentType::BookChapter => &self.vocab.book_chapter,
            DocumentType::Review => &self.vocab.review,
        };
        out.push(Triple::new(
            publication.clone(),
            self.vocab.rdf_type.clone(),
            class.clone(),
        ));

        self.emit_properties(row, &publication, out, warnings)?;
        self.emit_keywords(row, &publication, out, warnings)?;
        self.emit_authorships(row, &publication, &doi_slug, author_ids, out)
    }

    fn emit_properties(
        &self,
        row: &Row,
        publication: &NamedNode,
        out: &mut Vec<Triple>,
        warnings: &mut Vec<RowError>,
    ) -> Result<(), RowError> {
        for (role, encoding, predicate) in PROPERTY_TABLE {
            let Some(value) = self.value(row, role) else {
                continue;
            };
            let predicate = predicate(self.vocab).clone();
            match encoding {
                Encoding::Plain => out.push(Triple::new(
                    publication.clone(),
                    predicate,
                    Literal::new_simple_literal(value),
                )),
                Encoding::Year => out.push(Triple::new(
                    publication.clone(),
                    predicate,
                    Literal::new_typed_literal(value.trim(), self.vocab.xsd_g_year.clone()),
                )),
                Encoding::Integer => {
                    let count: i64 =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| RowError::InvalidInteger {
                                column: role.label().to_string(),
                                value: value.to_string(),
                            })?;
                    out.push(Triple::new(publication.clone(), predicate, Literal::from(count)));
                }
                Encoding::Iri => {
                    out.push(Triple::new(publication.clone(), predicate, iri(value.trim())?));
                }
                Encoding::Source => {
                    let source_slug = slug(value);
                    if source_slug.is_empty() {
                        warnings.push(RowError::UnusableLabel {
                            column: role.label().to_string(),
                            value: value.to_string(),
                        });
                        continue;
                    }
                    let source = self.vocab.mint(Category::Source, &source_slug)?;
                    out.push(Triple::new(
                        source.clone(),
                        self.vocab.rdf_type.clone(),
                        self.vocab.journal.clone(),
                    ));
                    out.push(Triple::new(
                        source.clone(),
                        self.vocab.title.clone(),
                        Literal::new_simple_literal(value),
                    ));
                    out.push(Triple::new(publication.clone(), predicate, source));
                }
            }
        }
        Ok(())
    }

    fn emit_keywords(
        &self,
        row: &Row,
        publication: &NamedNode,
        out: &mut Vec<Triple>,
        warnings: &mut Vec<RowError>,
    ) -> Result<(), RowError> {
        let Some(keywords) = self.value(row, Role::AuthorKeywords) else {
            return Ok(());
        };
        for (_, keyword) in positional_tokens(keywords) {
            let keyword_slug = slug(keyword);
            if keyword_slug.is_empty() {
                warnings.push(RowError::UnusableLabel {
                    column: Role::AuthorKeywords.label().to_string(),
                    value: keyword.to_string(),
                });
                continue;
            }
            let node = self.vocab.mint(Category::Keyword, &keyword_slug)?;
            out.push(Triple::new(
                node.clone(),
                self.vocab.rdf_type.clone(),
                self.vocab.concept.clone(),
            ));
            out.push(Triple::new(
                node.clone(),
                self.vocab.pref_label.clone(),
                Literal::new_language_tagged_literal_unchecked(keyword, "en"),
            ));
            out.push(Triple::new(
                publication.clone(),
                self.vocab.subject.clone(),
                node,
            ));
        }
        Ok(())
    }

    fn emit_authorships(
        &self,
        row: &Row,
        publication: &NamedNode,
        doi_slug: &str,
        author_ids: &str,
        out: &mut Vec<Triple>,
    ) -> Result<(), RowError> {
        let names: Vec<&str> = self
            .value(row, Role::AuthorNames)
            .map(|n| n.split(MULTI_VALUE_SEPARATOR).collect())
            .unwrap_or_default();

        for (rank, author_id) in positional_tokens(author_ids) {
            let author = self.vocab.mint(Category::Author, author_id)?;
            out.push(Triple::new(
                author.clone(),
                self.vocab.rdf_type.clone(),
                self.vocab.person.clone(),
            ));
            out.push(Triple::new(
                author.clone(),
                self.vocab.same_as.clone(),
                self.vocab.author_profile(author_id)?,
            ));
            if let Some(name) = names.get(rank - 1).and_then(|entry| author_name(entry)) {
                out.push(Triple::new(
                    author.clone(),
                    self.vocab.name.clone(),
                    Literal::new_simple_literal(name),
                ));
            }

            let authorship = self
                .vocab
                .mint(Category::Authorship, &format!("{doi_slug}/{author_id}"))?;
            out.push(Triple::new(
                publication.clone(),
                self.vocab.related_by.clone(),
                authorship.clone(),
            ));
            out.push(Triple::new(
                authorship.clone(),
                self.vocab.rdf_type.clone(),
                self.vocab.authorship.clone(),
            ));
            out.push(Triple::new(
                authorship.clone(),
                self.vocab.relates.clone(),
                author,
            ));
            out.push(Triple::new(
                authorship,
                self.vocab.rank.clone(),
                Literal::new_typed_literal(rank.to_string(), self.vocab.xsd_integer.clone()),
            ));
        }
        Ok(())
    }
}
