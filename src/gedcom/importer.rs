//! GEDCOM-importer som bygger en träd-snapshot
//!
//! Importen får aldrig lämna ifrån sig hängande referenser: partner-
//! och barnreferenser som inte kan lösas upp släpps med en varning,
//! och familjer som därmed blir helt tomma hoppas över.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::{FamilyFields, FamilyTree, Gender, PersonFields};

use super::models::{GedcomData, GedcomIndividual};
use super::parser::GedcomParser;

/// Resultat av en GEDCOM-import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Antal importerade personer
    pub persons_imported: usize,
    /// Antal importerade familjer
    pub families_imported: usize,
    /// Antal släppta referenser (olösbara partner/barn)
    pub skipped_references: usize,
    /// Varningar
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sammanfattning av importen
    pub fn summary(&self) -> String {
        format!(
            "{} personer, {} familjer importerade{}",
            self.persons_imported,
            self.families_imported,
            if self.skipped_references > 0 {
                format!(" ({} referenser släppta)", self.skipped_references)
            } else {
                String::new()
            }
        )
    }
}

/// Ett importerat träd med tillhörande statistik
#[derive(Debug, Clone)]
pub struct ImportedTree {
    pub tree: FamilyTree,
    pub result: ImportResult,
}

/// GEDCOM-importer
pub struct GedcomImporter;

impl GedcomImporter {
    /// Importera en GEDCOM-fil till en ny träd-snapshot
    pub fn import_file(path: &Path, tree_name: &str) -> Result<ImportedTree> {
        let data = GedcomParser::parse_file(path).context("Kunde inte parsa GEDCOM-fil")?;
        Ok(Self::import_data(&data, tree_name))
    }

    /// Importera GEDCOM från en sträng
    pub fn import_string(content: &str, tree_name: &str) -> Result<ImportedTree> {
        let data = GedcomParser::parse_string(content).context("Kunde inte parsa GEDCOM-data")?;
        Ok(Self::import_data(&data, tree_name))
    }

    /// Bygg en träd-snapshot ur parsad GEDCOM-data
    pub fn import_data(data: &GedcomData, tree_name: &str) -> ImportedTree {
        let mut tree = FamilyTree::new(tree_name);
        let mut result = ImportResult::new();

        // Mappning från GEDCOM-xref till person-id i trädet
        let mut id_map: HashMap<&str, String> = HashMap::new();

        for indi in &data.individuals {
            if indi.id.is_empty() {
                result
                    .warnings
                    .push(format!("Individ utan xref hoppas över: {}", indi.full_name()));
                continue;
            }

            let person_id = tree.add_person(Self::person_fields(indi)).id.clone();
            id_map.insert(indi.id.as_str(), person_id);
            result.persons_imported += 1;
        }

        for family in &data.families {
            let mut resolve = |xref: &Option<String>| -> Option<String> {
                let xref = xref.as_deref()?;
                match id_map.get(xref) {
                    Some(id) => Some(id.clone()),
                    None => {
                        warn!(familj = %family.id, xref, "olösbar partnerreferens släpps");
                        result.skipped_references += 1;
                        None
                    }
                }
            };
            let partner1_id = resolve(&family.husband_id);
            let partner2_id = resolve(&family.wife_id);

            let mut child_ids = Vec::with_capacity(family.children_ids.len());
            for child_xref in &family.children_ids {
                match id_map.get(child_xref.as_str()) {
                    Some(id) => child_ids.push(id.clone()),
                    None => {
                        warn!(familj = %family.id, xref = %child_xref, "olösbar barnreferens släpps");
                        result.skipped_references += 1;
                    }
                }
            }

            if partner1_id.is_none() && partner2_id.is_none() && child_ids.is_empty() {
                result.warnings.push(format!(
                    "Familj {} saknar upplösbara medlemmar och hoppas över",
                    family.id
                ));
                continue;
            }

            let added = tree.add_family(FamilyFields {
                partner1_id,
                partner2_id,
                child_ids,
            });
            match added {
                Ok(_) => result.families_imported += 1,
                // Kan inte inträffa: alla referenser är redan upplösta,
                // men en varning är bättre än ett avbrott
                Err(e) => result
                    .warnings
                    .push(format!("Familj {} kunde inte läggas till: {}", family.id, e)),
            }
        }

        ImportedTree { tree, result }
    }

    fn person_fields(indi: &GedcomIndividual) -> PersonFields {
        PersonFields {
            firstname: indi.firstname.clone().unwrap_or_default(),
            surname: indi.surname.clone().unwrap_or_default(),
            birth_date: indi.birth_date.clone(),
            birth_place: indi.birth_place.clone(),
            death_date: indi.death_date.clone(),
            death_place: indi.death_place.clone(),
            gender: indi
                .sex
                .as_deref()
                .map(Gender::from_gedcom)
                .unwrap_or_default(),
            photo_url: None,
            notes: if indi.notes.is_empty() {
                None
            } else {
                Some(indi.notes.join("\n"))
            },
        }
    }
}
