//! Datastrukturer för GEDCOM-data
//!
//! Datum bevaras som de står i filen, eftersom trädmodellens datum är fritext
//! och aldrig tolkas som kalenderdatum.

/// En individ från GEDCOM-fil
#[derive(Debug, Clone, Default)]
pub struct GedcomIndividual {
    /// GEDCOM-ID (t.ex. "@I1@")
    pub id: String,
    /// Förnamn
    pub firstname: Option<String>,
    /// Efternamn
    pub surname: Option<String>,
    /// Kön (M/F/U)
    pub sex: Option<String>,
    /// Födelsedatum, ordagrann DATE-sträng
    pub birth_date: Option<String>,
    /// Födelseort
    pub birth_place: Option<String>,
    /// Dödsdatum, ordagrann DATE-sträng
    pub death_date: Option<String>,
    /// Dödsort
    pub death_place: Option<String>,
    /// Anteckningar
    pub notes: Vec<String>,
}

impl GedcomIndividual {
    /// Hämta fullständigt namn
    pub fn full_name(&self) -> String {
        match (&self.firstname, &self.surname) {
            (Some(f), Some(s)) => format!("{} {}", f, s),
            (Some(f), None) => f.clone(),
            (None, Some(s)) => s.clone(),
            (None, None) => "Okänd".to_string(),
        }
    }
}

/// En familj från GEDCOM-fil
#[derive(Debug, Clone, Default)]
pub struct GedcomFamily {
    /// GEDCOM-ID (t.ex. "@F1@")
    pub id: String,
    /// Make/man (HUSB)
    pub husband_id: Option<String>,
    /// Maka/hustru (WIFE)
    pub wife_id: Option<String>,
    /// Barn (CHIL)
    pub children_ids: Vec<String>,
}

/// Resultat av GEDCOM-parsning
#[derive(Debug, Clone, Default)]
pub struct GedcomData {
    /// Alla individer
    pub individuals: Vec<GedcomIndividual>,
    /// Alla familjer
    pub families: Vec<GedcomFamily>,
    /// Metadata från HEAD
    pub source: Option<String>,
    /// Charset
    pub charset: Option<String>,
}

impl GedcomData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hitta individ med ID
    pub fn find_individual(&self, id: &str) -> Option<&GedcomIndividual> {
        self.individuals.iter().find(|i| i.id == id)
    }

    /// Hitta familj med ID
    pub fn find_family(&self, id: &str) -> Option<&GedcomFamily> {
        self.families.iter().find(|f| f.id == id)
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }
}
