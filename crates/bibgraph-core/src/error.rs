//! Error types for mapping construction and per-row conversion

/// Failure or warning while converting a single admissible row.
///
/// Row errors never abort a run: the runner records them against the row
/// and moves on. `UnusableLabel` is only ever a warning; the row still
/// converts without the affected item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// A value that must be an integer (e.g. citation count) is not one.
    InvalidInteger { column: String, value: String },
    /// A value used as an IRI (link column or minted identifier) is not a valid IRI.
    InvalidIri { value: String, message: String },
    /// The DOI normalizes to an empty slug, so no publication identifier exists.
    EmptyIdentifier { value: String },
    /// A keyword or source name has no ASCII letters or digits to build an
    /// identifier from (e.g. Cyrillic or CJK text), so the item was left out.
    UnusableLabel { column: String, value: String },
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInteger { column, value } => {
                write!(f, "invalid integer {value:?} in column '{column}'")
            }
            Self::InvalidIri { value, message } => write!(f, "invalid IRI <{value}>: {message}"),
            Self::EmptyIdentifier { value } => {
                write!(f, "DOI {value:?} does not yield a usable identifier")
            }
            Self::UnusableLabel { column, value } => {
                write!(f, "{column} {value:?} does not yield a usable identifier; skipped")
            }
        }
    }
}

impl std::error::Error for RowError {}

/// Invalid role mapping, detected once when the mapping is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The label does not name any known role.
    UnknownRole(String),
    /// The mapped column is not in the table header.
    UnknownColumn { role: String, column: String },
    /// An assignment is not of the form `Role=Column`.
    Malformed(String),
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRole(label) => write!(f, "unknown role '{label}'"),
            Self::UnknownColumn { role, column } => {
                write!(f, "role '{role}' mapped to missing column '{column}'")
            }
            Self::Malformed(s) => write!(f, "expected ROLE=COLUMN, got '{s}'"),
        }
    }
}

impl std::error::Error for MappingError {}
