//! `bibgraph suggest` - show the mapping guessed from a CSV header

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use bibgraph_core::{Role, RoleMapping};

use crate::config::{Config, delimiter_byte};

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// CSV field delimiter
    #[arg(short, long)]
    pub delimiter: Option<char>,
}

pub fn run(args: SuggestArgs, config: &Config) -> Result<()> {
    let delimiter = match args.delimiter {
        Some(c) => delimiter_byte(c)?,
        None => config.input.delimiter_byte()?,
    };
    let table = bibgraph_core::Table::from_path(&args.input, delimiter)?;
    let mapping = RoleMapping::suggest(table.headers());

    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Column").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
        ]);
    for (column, role) in column_roles(table.headers(), &mapping) {
        let role = match role {
            Some(role) => Cell::new(role.label()).fg(Color::Green),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        out.add_row(vec![Cell::new(column), role]);
    }
    eprintln!("\n{out}");

    let missing = unmapped_roles(&mapping);
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|r| r.label()).collect();
        eprintln!("\nUnmapped roles: {}", labels.join(", "));
    }
    if mapping.column(Role::Doi).is_none() || mapping.column(Role::AuthorIds).is_none() {
        eprintln!("DOI and Author(s) ID must be mapped (--map) or no rows will convert.");
    }
    Ok(())
}

/// Each header column with the role it was given, in header order.
fn column_roles<'a>(headers: &'a [String], mapping: &RoleMapping) -> Vec<(&'a str, Option<Role>)> {
    headers
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let role = mapping
                .iter()
                .find(|(_, c)| c.index == index)
                .map(|(role, _)| role);
            (name.as_str(), role)
        })
        .collect()
}

fn unmapped_roles(mapping: &RoleMapping) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|r| mapping.column(*r).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn columns_keep_header_order() {
        let h = headers(&["Title", "Notes", "DOI"]);
        let mapping = RoleMapping::suggest(&h);
        assert_eq!(
            column_roles(&h, &mapping),
            vec![
                ("Title", Some(Role::Title)),
                ("Notes", None),
                ("DOI", Some(Role::Doi)),
            ]
        );
    }

    #[test]
    fn unmapped_lists_remaining_roles() {
        let h = headers(&["DOI"]);
        let missing = unmapped_roles(&RoleMapping::suggest(&h));
        assert_eq!(missing.len(), Role::ALL.len() - 1);
        assert!(!missing.contains(&Role::Doi));
    }
}
