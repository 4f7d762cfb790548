//! GEDCOM-parser för GEDCOM 5.5-filer
//!
//! Radbaserad parsning av INDI- och FAM-poster. Datumvärden lämnas
//! ordagranna; GIVN/SURN-undertaggar föredras framför tolkning av
//! NAME-radens snedstrecksform när de finns.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use super::models::{GedcomData, GedcomFamily, GedcomIndividual};

/// GEDCOM-parser
pub struct GedcomParser;

/// En rad i GEDCOM-filen
#[derive(Debug)]
struct GedcomLine {
    level: u32,
    tag: String,
    value: Option<String>,
    xref: Option<String>,
}

impl GedcomParser {
    /// Parsa en GEDCOM-fil
    pub fn parse_file(path: &Path) -> Result<GedcomData> {
        let file = File::open(path).context("Kunde inte öppna GEDCOM-fil")?;
        let reader = BufReader::new(file);
        Self::parse_reader(reader)
    }

    /// Parsa GEDCOM från en sträng
    pub fn parse_string(content: &str) -> Result<GedcomData> {
        let reader = BufReader::new(content.as_bytes());
        Self::parse_reader(reader)
    }

    fn parse_reader<R: BufRead>(reader: R) -> Result<GedcomData> {
        let mut data = GedcomData::new();
        let mut lines: Vec<GedcomLine> = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.context("Kunde inte läsa rad")?;
            if let Some(parsed) = Self::parse_line(&line) {
                lines.push(parsed);
            }
        }

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];

            if line.level == 0 {
                match line.tag.as_str() {
                    "HEAD" => {
                        let consumed = Self::parse_header(&lines[i..], &mut data);
                        i += consumed;
                        continue;
                    }
                    "INDI" => {
                        let (indi, consumed) = Self::parse_individual(&lines[i..]);
                        data.individuals.push(indi);
                        i += consumed;
                        continue;
                    }
                    "FAM" => {
                        let (fam, consumed) = Self::parse_family(&lines[i..]);
                        data.families.push(fam);
                        i += consumed;
                        continue;
                    }
                    _ => {}
                }
            }

            i += 1;
        }

        Ok(data)
    }

    fn parse_line(line: &str) -> Option<GedcomLine> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        // Ta bort BOM om det finns
        let line = line.trim_start_matches('\u{feff}');

        let parts: Vec<&str> = line.splitn(3, ' ').collect();
        let level = parts.first()?.parse::<u32>().ok()?;

        if parts.len() < 2 {
            return None;
        }

        // Kolla om det är en xref (t.ex. @I1@)
        let (xref, tag, value) = if parts[1].starts_with('@') && parts[1].ends_with('@') {
            let xref = Some(parts[1].to_string());
            let tag = parts.get(2).map(|s| s.to_string()).unwrap_or_default();
            (xref, tag, None)
        } else {
            let tag = parts[1].to_string();
            let value = parts.get(2).map(|s| s.to_string());
            (None, tag, value)
        };

        Some(GedcomLine {
            level,
            tag,
            value,
            xref,
        })
    }

    fn parse_header(lines: &[GedcomLine], data: &mut GedcomData) -> usize {
        let mut i = 1; // Hoppa över HEAD-raden

        while i < lines.len() {
            let line = &lines[i];
            if line.level == 0 {
                break;
            }

            match line.tag.as_str() {
                "SOUR" if line.level == 1 => data.source = line.value.clone(),
                "CHAR" if line.level == 1 => data.charset = line.value.clone(),
                _ => {}
            }

            i += 1;
        }

        i
    }

    fn parse_individual(lines: &[GedcomLine]) -> (GedcomIndividual, usize) {
        let mut indi = GedcomIndividual::default();

        if let Some(xref) = &lines[0].xref {
            indi.id = xref.clone();
        }

        let mut i = 1;
        while i < lines.len() {
            let line = &lines[i];
            if line.level == 0 {
                break;
            }

            match line.tag.as_str() {
                "NAME" => {
                    let consumed = Self::parse_name_record(&lines[i..], &mut indi);
                    i += consumed;
                    continue;
                }
                "SEX" => {
                    indi.sex = line.value.clone();
                }
                "BIRT" => {
                    let (date, place, consumed) = Self::parse_event(&lines[i..]);
                    indi.birth_date = date;
                    indi.birth_place = place;
                    i += consumed;
                    continue;
                }
                "DEAT" => {
                    let (date, place, consumed) = Self::parse_event(&lines[i..]);
                    indi.death_date = date;
                    indi.death_place = place;
                    i += consumed;
                    continue;
                }
                "NOTE" => {
                    if let Some(ref note) = line.value {
                        indi.notes.push(note.clone());
                    }
                }
                _ => {}
            }

            i += 1;
        }

        (indi, i)
    }

    /// Parsa en NAME-post med undertaggar. GIVN/SURN vinner över
    /// snedstrecksformen; efterföljande NAME-poster (t.ex. TYPE aka)
    /// skriver inte över ett redan satt namn.
    fn parse_name_record(lines: &[GedcomLine], indi: &mut GedcomIndividual) -> usize {
        let base_level = lines[0].level;
        let already_named = indi.firstname.is_some() || indi.surname.is_some();

        let mut slash_first = None;
        let mut slash_last = None;
        if let Some(ref raw) = lines[0].value {
            let (f, s) = Self::parse_name(raw);
            slash_first = f;
            slash_last = s;
        }

        let mut given = None;
        let mut surname = None;
        let mut i = 1;
        while i < lines.len() {
            let line = &lines[i];
            if line.level <= base_level {
                break;
            }
            if line.level == base_level + 1 {
                match line.tag.as_str() {
                    "GIVN" => given = line.value.clone(),
                    "SURN" => surname = line.value.clone(),
                    _ => {}
                }
            }
            i += 1;
        }

        if !already_named {
            if given.is_some() || surname.is_some() {
                indi.firstname = given;
                indi.surname = surname;
            } else {
                indi.firstname = slash_first;
                indi.surname = slash_last;
            }
        }

        i
    }

    fn parse_family(lines: &[GedcomLine]) -> (GedcomFamily, usize) {
        let mut fam = GedcomFamily::default();

        if let Some(xref) = &lines[0].xref {
            fam.id = xref.clone();
        }

        let mut i = 1;
        while i < lines.len() {
            let line = &lines[i];
            if line.level == 0 {
                break;
            }

            match line.tag.as_str() {
                "HUSB" if line.level == 1 => {
                    fam.husband_id = line.value.clone();
                }
                "WIFE" if line.level == 1 => {
                    fam.wife_id = line.value.clone();
                }
                "CHIL" if line.level == 1 => {
                    if let Some(ref child_id) = line.value {
                        fam.children_ids.push(child_id.clone());
                    }
                }
                _ => {}
            }

            i += 1;
        }

        (fam, i)
    }

    /// Parsa ett event (BIRT/DEAT). DATE och PLAC matchas bara på direkt
    /// undernivå; djupare nivåer (SOUR→DATA→DATE) ska ignoreras.
    fn parse_event(lines: &[GedcomLine]) -> (Option<String>, Option<String>, usize) {
        let mut date = None;
        let mut place = None;
        let base_level = lines[0].level;
        let event_level = base_level + 1;

        let mut i = 1;
        while i < lines.len() {
            let line = &lines[i];
            if line.level <= base_level {
                break;
            }

            if line.level == event_level {
                match line.tag.as_str() {
                    "DATE" => date = line.value.clone(),
                    "PLAC" => place = line.value.clone(),
                    _ => {}
                }
            }

            i += 1;
        }

        (date, place, i)
    }

    fn parse_name(name: &str) -> (Option<String>, Option<String>) {
        // GEDCOM-namn är i formatet "Förnamn /Efternamn/"
        let name = name.trim();

        if let Some(slash_pos) = name.find('/') {
            let firstname = name[..slash_pos].trim();
            let rest = &name[slash_pos + 1..];

            let surname = match rest.find('/') {
                Some(end_slash) => rest[..end_slash].trim(),
                None => rest.trim(),
            };

            let firstname = (!firstname.is_empty()).then(|| firstname.to_string());
            let surname = (!surname.is_empty()).then(|| surname.to_string());

            (firstname, surname)
        } else if name.is_empty() {
            (None, None)
        } else {
            // Inget efternamn markerat
            (Some(name.to_string()), None)
        }
    }
}
