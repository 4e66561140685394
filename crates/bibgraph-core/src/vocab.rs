//! Namespaces and vocabulary terms used by the row mapper

use oxrdf::vocab::{rdf, xsd};
use oxrdf::NamedNode;

use crate::error::RowError;

pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const BIBO: &str = "http://purl.org/ontology/bibo/";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const VIVO: &str = "http://vivoweb.org/ontology/core#";
pub const PRISM: &str = "http://prismstandard.org/namespaces/basic/2.0/";
pub const CITO: &str = "http://purl.org/spar/cito/";
pub const SCHEMA: &str = "http://schema.org/";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Namespace under which every generated identifier is minted.
pub const RESOURCE: &str = "http://universidades.ec/resource/";

/// External author profile, keyed by the raw author-ID token.
pub const SCOPUS_AUTHOR_PROFILE: &str = "https://www.scopus.com/authid/detail.uri?authorId=";

/// Prefix bindings emitted in Turtle output, in declaration order.
pub const PREFIXES: &[(&str, &str)] = &[
    ("dcterms", DCTERMS),
    ("foaf", FOAF),
    ("bibo", BIBO),
    ("skos", SKOS),
    ("vivo", VIVO),
    ("prism", PRISM),
    ("cito", CITO),
    ("schema", SCHEMA),
    ("owl", OWL),
    ("xsd", XSD),
    ("res", RESOURCE),
];

/// Category segment of a minted resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Publication,
    Author,
    Authorship,
    Keyword,
    Source,
}

impl Category {
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Publication => "publication",
            Self::Author => "author",
            Self::Authorship => "authorship",
            Self::Keyword => "keyword",
            Self::Source => "source",
        }
    }
}

fn term(namespace: &str, local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{namespace}{local}"))
}

/// Immutable term table, built once per run and shared by reference.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    base: String,

    pub rdf_type: NamedNode,
    pub xsd_integer: NamedNode,
    pub xsd_g_year: NamedNode,

    // Classes
    pub article: NamedNode,
    pub book_chapter: NamedNode,
    pub review: NamedNode,
    pub journal: NamedNode,
    pub concept: NamedNode,
    pub person: NamedNode,
    pub authorship: NamedNode,

    // Publication properties
    pub title: NamedNode,
    pub doi: NamedNode,
    pub eid: NamedNode,
    pub url: NamedNode,
    pub created: NamedNode,
    pub cited_by_count: NamedNode,
    pub is_part_of: NamedNode,
    pub volume: NamedNode,
    pub issue: NamedNode,
    pub number: NamedNode,
    pub page_start: NamedNode,
    pub page_end: NamedNode,
    pub subject: NamedNode,

    // Keyword, author and authorship properties
    pub pref_label: NamedNode,
    pub name: NamedNode,
    pub same_as: NamedNode,
    pub related_by: NamedNode,
    pub relates: NamedNode,
    pub rank: NamedNode,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            base: RESOURCE.to_string(),
            rdf_type: rdf::TYPE.into_owned(),
            xsd_integer: xsd::INTEGER.into_owned(),
            xsd_g_year: xsd::G_YEAR.into_owned(),
            article: term(BIBO, "Article"),
            book_chapter: term(BIBO, "BookChapter"),
            review: term(BIBO, "Review"),
            journal: term(BIBO, "Journal"),
            concept: term(SKOS, "Concept"),
            person: term(FOAF, "Person"),
            authorship: term(VIVO, "Authorship"),
            title: term(DCTERMS, "title"),
            doi: term(BIBO, "doi"),
            eid: term(BIBO, "eid"),
            url: term(SCHEMA, "url"),
            created: term(DCTERMS, "created"),
            cited_by_count: term(CITO, "isCitedByCount"),
            is_part_of: term(DCTERMS, "isPartOf"),
            volume: term(BIBO, "volume"),
            issue: term(BIBO, "issue"),
            number: term(BIBO, "number"),
            page_start: term(BIBO, "pageStart"),
            page_end: term(BIBO, "pageEnd"),
            subject: term(DCTERMS, "subject"),
            pref_label: term(SKOS, "prefLabel"),
            name: term(FOAF, "name"),
            same_as: term(OWL, "sameAs"),
            related_by: term(VIVO, "relatedBy"),
            relates: term(VIVO, "relates"),
            rank: term(VIVO, "rank"),
        }
    }

    /// Mint `<base><category>/<token>`, rejecting tokens that make an invalid IRI.
    pub fn mint(&self, category: Category, token: &str) -> Result<NamedNode, RowError> {
        iri(format!("{}{}/{token}", self.base, category.segment()))
    }

    /// Profile URL asserted as `owl:sameAs` for an author.
    pub fn author_profile(&self, author_id: &str) -> Result<NamedNode, RowError> {
        iri(format!("{SCOPUS_AUTHOR_PROFILE}{author_id}"))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an absolute IRI, mapping failures to a row error.
pub fn iri(value: impl Into<String>) -> Result<NamedNode, RowError> {
    let value = value.into();
    NamedNode::new(value.as_str()).map_err(|e| RowError::InvalidIri {
        value,
        message: e.to_string(),
    })
}
