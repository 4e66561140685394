//! Semantic roles and the role → column mapping

use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::MappingError;

/// Semantic category a table column can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Role {
    Doi,
    Title,
    AuthorIds,
    AuthorNames,
    Year,
    SourceTitle,
    Volume,
    Issue,
    ArticleNumber,
    PageStart,
    PageEnd,
    CitedBy,
    Link,
    Eid,
    DocumentType,
    AuthorKeywords,
}

impl Role {
    pub const ALL: [Role; 16] = [
        Role::Doi,
        Role::Title,
        Role::AuthorIds,
        Role::AuthorNames,
        Role::Year,
        Role::SourceTitle,
        Role::Volume,
        Role::Issue,
        Role::ArticleNumber,
        Role::PageStart,
        Role::PageEnd,
        Role::CitedBy,
        Role::Link,
        Role::Eid,
        Role::DocumentType,
        Role::AuthorKeywords,
    ];

    /// Canonical label, as it appears in citation database exports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Doi => "DOI",
            Self::Title => "Title",
            Self::AuthorIds => "Author(s) ID",
            Self::AuthorNames => "Author full names",
            Self::Year => "Year",
            Self::SourceTitle => "Source title",
            Self::Volume => "Volume",
            Self::Issue => "Issue",
            Self::ArticleNumber => "Art. No.",
            Self::PageStart => "Page start",
            Self::PageEnd => "Page end",
            Self::CitedBy => "Cited by",
            Self::Link => "Link",
            Self::Eid => "EID",
            Self::DocumentType => "Document Type",
            Self::AuthorKeywords => "Author Keywords",
        }
    }

    /// Look up a role by label, ignoring case and whitespace.
    pub fn from_label(label: &str) -> Option<Role> {
        let wanted = compact(label);
        Self::ALL.into_iter().find(|r| compact(r.label()) == wanted)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Role {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| MappingError::UnknownRole(s.trim().to_string()))
    }
}

/// Lowercased with all whitespace removed.
fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A column resolved against the table header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub index: usize,
    pub name: String,
}

/// Role → column assignment, resolved to header positions once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMapping {
    columns: [Option<Column>; Role::ALL.len()],
}

impl RoleMapping {
    /// Build a mapping from explicit `(role, column name)` assignments.
    ///
    /// Fails if any column is not in `headers`.
    pub fn new<'a, I>(headers: &[String], assignments: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (Role, &'a str)>,
    {
        let mut mapping = Self::default();
        for (role, column) in assignments {
            mapping.assign(headers, role, Some(column))?;
        }
        Ok(mapping)
    }

    /// Guess a mapping from header names.
    ///
    /// A column whose name equals a role label (ignoring case and spaces)
    /// takes that role. Otherwise the column gets the role with the longest
    /// label contained in its name, so "Source title" is not mistaken for
    /// "Title". Exact matches win over contained ones; among equals, the
    /// first column wins.
    pub fn suggest(headers: &[String]) -> Self {
        let mut mapping = Self::default();
        let mut claimed = FxHashSet::default();

        let compact_headers: Vec<String> = headers.iter().map(|h| compact(h)).collect();

        for (index, name) in compact_headers.iter().enumerate() {
            if let Some(role) = Role::from_label(name) {
                if claimed.insert(role) {
                    mapping.set(role, index, &headers[index]);
                }
            }
        }

        for (index, name) in compact_headers.iter().enumerate() {
            if name.is_empty() || mapping.role_of(index).is_some() {
                continue;
            }
            let best = Role::ALL
                .into_iter()
                .filter(|r| !claimed.contains(r))
                .map(|r| (r, compact(r.label())))
                .filter(|(_, label)| name.contains(label.as_str()))
                .max_by_key(|(_, label)| label.len());
            if let Some((role, _)) = best {
                claimed.insert(role);
                mapping.set(role, index, &headers[index]);
            }
        }

        mapping
    }

    /// Parse a `Role=Column` assignment. An empty column or `-` means "ignore".
    pub fn parse_assignment(s: &str) -> Result<(Role, Option<String>), MappingError> {
        let (role, column) = s
            .split_once('=')
            .ok_or_else(|| MappingError::Malformed(s.to_string()))?;
        let role: Role = role.parse()?;
        let column = column.trim();
        if column.is_empty() || column == "-" {
            Ok((role, None))
        } else {
            Ok((role, Some(column.to_string())))
        }
    }

    /// Assign (or with `None`, clear) the column for `role`.
    pub fn assign(
        &mut self,
        headers: &[String],
        role: Role,
        column: Option<&str>,
    ) -> Result<(), MappingError> {
        let Some(column) = column.map(str::trim) else {
            self.columns[role.index()] = None;
            return Ok(());
        };
        let index = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| MappingError::UnknownColumn {
                role: role.label().to_string(),
                column: column.to_string(),
            })?;
        self.set(role, index, column);
        Ok(())
    }

    fn set(&mut self, role: Role, index: usize, name: &str) {
        self.columns[role.index()] = Some(Column {
            index,
            name: name.to_string(),
        });
    }

    fn role_of(&self, index: usize) -> Option<Role> {
        self.iter().find(|(_, c)| c.index == index).map(|(r, _)| r)
    }

    pub fn column(&self, role: Role) -> Option<&Column> {
        self.columns[role.index()].as_ref()
    }

    /// Mapped roles in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &Column)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(|r| self.column(r).map(|c| (r, c)))
    }

    pub fn len(&self) -> usize {
        self.columns.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn labels_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_label(role.label()), Some(role));
        }
    }

    #[test]
    fn parse_role_loose() {
        assert_eq!("author(s) id".parse::<Role>().unwrap(), Role::AuthorIds);
        assert_eq!("CitedBy".parse::<Role>().unwrap(), Role::CitedBy);
        assert!("Abstract".parse::<Role>().is_err());
    }

    #[test]
    fn new_rejects_unknown_column() {
        let h = headers(&["DOI", "Title"]);
        let err = RoleMapping::new(&h, [(Role::Year, "Year")]).unwrap_err();
        assert_eq!(
            err,
            MappingError::UnknownColumn {
                role: "Year".to_string(),
                column: "Year".to_string()
            }
        );
    }

    #[test]
    fn new_resolves_indices() {
        let h = headers(&["Title", "DOI"]);
        let m = RoleMapping::new(&h, [(Role::Doi, "DOI")]).unwrap();
        assert_eq!(m.column(Role::Doi).unwrap().index, 1);
        assert!(m.column(Role::Title).is_none());
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn suggest_scopus_header() {
        let h = headers(&[
            "Authors",
            "Author full names",
            "Author(s) ID",
            "Title",
            "Year",
            "Source title",
            "Volume",
            "Issue",
            "Art. No.",
            "Page start",
            "Page end",
            "Cited by",
            "DOI",
            "Link",
            "Author Keywords",
            "Index Keywords",
            "Document Type",
            "EID",
        ]);
        let m = RoleMapping::suggest(&h);
        assert_eq!(m.len(), 16);
        assert_eq!(m.column(Role::Title).unwrap().name, "Title");
        assert_eq!(m.column(Role::SourceTitle).unwrap().name, "Source title");
        assert_eq!(m.column(Role::AuthorKeywords).unwrap().name, "Author Keywords");
        assert!(m.iter().all(|(_, c)| c.name != "Authors"));
    }

    #[test]
    fn suggest_prefers_exact_match() {
        let h = headers(&["Document Title", "title"]);
        let m = RoleMapping::suggest(&h);
        assert_eq!(m.column(Role::Title).unwrap().index, 1);
    }

    #[test]
    fn suggest_contained_name() {
        let h = headers(&["Article DOI"]);
        let m = RoleMapping::suggest(&h);
        assert_eq!(m.column(Role::Doi).unwrap().name, "Article DOI");
    }

    #[test]
    fn parse_assignment_forms() {
        assert_eq!(
            RoleMapping::parse_assignment("Title=Article Title").unwrap(),
            (Role::Title, Some("Article Title".to_string()))
        );
        assert_eq!(
            RoleMapping::parse_assignment("Link=-").unwrap(),
            (Role::Link, None)
        );
        assert!(matches!(
            RoleMapping::parse_assignment("Title"),
            Err(MappingError::Malformed(_))
        ));
    }

    #[test]
    fn assign_none_clears() {
        let h = headers(&["DOI"]);
        let mut m = RoleMapping::suggest(&h);
        assert!(m.column(Role::Doi).is_some());
        m.assign(&h, Role::Doi, None).unwrap();
        assert!(m.is_empty());
    }
}
