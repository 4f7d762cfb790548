use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Field;

/// Kön enligt GEDCOM-konventionen (M/F/U).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Male => "Man",
            Self::Female => "Kvinna",
            Self::Unknown => "Okänt",
        }
    }

    pub fn as_gedcom(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }

    pub fn from_gedcom(s: &str) -> Self {
        match s.trim() {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Male, Self::Female, Self::Unknown]
    }
}

/// En person i ett släktträd.
///
/// Datumen är fritext (t.ex. "ca 1850" eller "23 MAY 1850") och tolkas
/// aldrig som kalenderdatum av kärnan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub tree_id: String,
    pub firstname: String,
    pub surname: String,
    pub birth_date: Option<String>,
    pub birth_place: Option<String>,
    pub death_date: Option<String>,
    pub death_place: Option<String>,
    pub gender: Gender,
    /// Opak bildreferens (t.ex. base64-kodad DataURL). Tolkas inte.
    pub photo_url: Option<String>,
    pub notes: Option<String>,
}

impl Person {
    pub(crate) fn from_fields(tree_id: &str, fields: PersonFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tree_id: tree_id.to_string(),
            firstname: fields.firstname,
            surname: fields.surname,
            birth_date: fields.birth_date,
            birth_place: fields.birth_place,
            death_date: fields.death_date,
            death_place: fields.death_place,
            gender: fields.gender,
            photo_url: fields.photo_url,
            notes: fields.notes,
        }
    }

    pub fn full_name(&self) -> String {
        match (self.firstname.is_empty(), self.surname.is_empty()) {
            (false, false) => format!("{} {}", self.firstname, self.surname),
            (false, true) => self.firstname.clone(),
            (true, false) => self.surname.clone(),
            (true, true) => "Okänd".to_string(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.death_date.is_none()
    }

    /// Levnadsår för visning, t.ex. "1850–1920" eller "1850–".
    pub fn lifespan(&self) -> String {
        match (&self.birth_date, &self.death_date) {
            (Some(b), Some(d)) => format!("{}–{}", b, d),
            (Some(b), None) => format!("{}–", b),
            (None, Some(d)) => format!("–{}", d),
            (None, None) => String::new(),
        }
    }
}

/// Fält för en ny person. Identitet och trädtillhörighet sätts av trädet.
#[derive(Debug, Clone, Default)]
pub struct PersonFields {
    pub firstname: String,
    pub surname: String,
    pub birth_date: Option<String>,
    pub birth_place: Option<String>,
    pub death_date: Option<String>,
    pub death_place: Option<String>,
    pub gender: Gender,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
}

impl PersonFields {
    pub fn named(firstname: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            surname: surname.into(),
            ..Default::default()
        }
    }
}

/// Partiell uppdatering av en person.
///
/// Obligatoriska fält: `None` = behåll, `Some` = skriv över (tom sträng
/// rensar). Valfria fält använder [`Field`] med tre lägen.
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
    pub firstname: Option<String>,
    pub surname: Option<String>,
    pub birth_date: Field<String>,
    pub birth_place: Field<String>,
    pub death_date: Field<String>,
    pub death_place: Field<String>,
    pub gender: Option<Gender>,
    pub photo_url: Field<String>,
    pub notes: Field<String>,
}

impl PersonPatch {
    pub(crate) fn apply(self, person: &mut Person) {
        if let Some(firstname) = self.firstname {
            person.firstname = firstname;
        }
        if let Some(surname) = self.surname {
            person.surname = surname;
        }
        self.birth_date.apply_to(&mut person.birth_date);
        self.birth_place.apply_to(&mut person.birth_place);
        self.death_date.apply_to(&mut person.death_date);
        self.death_place.apply_to(&mut person.death_place);
        if let Some(gender) = self.gender {
            person.gender = gender;
        }
        self.photo_url.apply_to(&mut person.photo_url);
        self.notes.apply_to(&mut person.notes);
    }
}
