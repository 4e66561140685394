//! `bibgraph roles` - list mappable roles and what they produce

use anyhow::Result;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use bibgraph_core::Role;

fn describe(role: Role) -> &'static str {
    match role {
        Role::Doi => "publication identifier (required)",
        Role::Title => "dcterms:title",
        Role::AuthorIds => "authors, ';'-separated (required)",
        Role::AuthorNames => "foaf:name per author, by position",
        Role::Year => "dcterms:created (xsd:gYear)",
        Role::SourceTitle => "bibo:Journal via dcterms:isPartOf",
        Role::Volume => "bibo:volume",
        Role::Issue => "bibo:issue",
        Role::ArticleNumber => "bibo:number",
        Role::PageStart => "bibo:pageStart",
        Role::PageEnd => "bibo:pageEnd",
        Role::CitedBy => "cito:isCitedByCount (xsd:integer)",
        Role::Link => "schema:url",
        Role::Eid => "bibo:eid",
        Role::DocumentType => "publication class",
        Role::AuthorKeywords => "skos:Concept per keyword",
    }
}

pub fn run() -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Produces").fg(Color::Cyan),
        ]);
    for role in Role::ALL {
        table.add_row(vec![role.label(), describe(role)]);
    }
    eprintln!("\n{table}");
    Ok(())
}
