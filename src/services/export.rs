//! Export-tjänst för att exportera träd till olika format (JSON, CSV)
//!
//! Exporterna är rena serialiseringar av snapshoten. Bildformat hör
//! hemma hos renderaren och exporteras inte härifrån.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::FamilyTree;

/// Exportformat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// Hela snapshoten som JSON
pub fn tree_to_json(tree: &FamilyTree) -> Result<String> {
    serde_json::to_string_pretty(tree).context("Kunde inte serialisera trädet")
}

/// Persontabellen som CSV
pub fn persons_to_csv(tree: &FamilyTree) -> String {
    let headers = [
        "id",
        "firstname",
        "surname",
        "gender",
        "birth_date",
        "birth_place",
        "death_date",
        "death_place",
        "notes",
    ];

    let mut out = String::new();
    out.push_str(&headers.join(","));
    out.push('\n');

    for person in &tree.persons {
        let fields = [
            person.id.as_str(),
            person.firstname.as_str(),
            person.surname.as_str(),
            person.gender.as_gedcom(),
            person.birth_date.as_deref().unwrap_or(""),
            person.birth_place.as_deref().unwrap_or(""),
            person.death_date.as_deref().unwrap_or(""),
            person.death_place.as_deref().unwrap_or(""),
            person.notes.as_deref().unwrap_or(""),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Skriv trädet till fil i valt format
pub fn export_tree(tree: &FamilyTree, format: ExportFormat, path: &Path) -> Result<()> {
    let content = match format {
        ExportFormat::Json => tree_to_json(tree)?,
        ExportFormat::Csv => persons_to_csv(tree),
    };

    let file = File::create(path)
        .with_context(|| format!("Kunde inte skapa exportfil: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;

    Ok(())
}

/// Citera enligt RFC 4180: värdet omges av citattecken och inbäddade
/// citattecken dubbleras.
fn csv_escape(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
