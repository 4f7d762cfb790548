use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Field;

/// En familjeenhet: upp till två partner och noll eller fler barn.
///
/// Barnlistan är ordnad i lagringen men saknar semantisk ordning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub tree_id: String,
    pub partner1_id: Option<String>,
    pub partner2_id: Option<String>,
    pub child_ids: Vec<String>,
}

impl Family {
    pub(crate) fn from_fields(tree_id: &str, fields: FamilyFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tree_id: tree_id.to_string(),
            partner1_id: fields.partner1_id,
            partner2_id: fields.partner2_id,
            child_ids: fields.child_ids,
        }
    }

    /// Närvarande partner-id:n, partner1 först.
    pub fn partners(&self) -> impl Iterator<Item = &str> {
        self.partner1_id
            .as_deref()
            .into_iter()
            .chain(self.partner2_id.as_deref())
    }

    pub fn has_partner(&self, person_id: &str) -> bool {
        self.partners().any(|p| p == person_id)
    }

    pub fn has_child(&self, person_id: &str) -> bool {
        self.child_ids.iter().any(|c| c == person_id)
    }

    /// Alla personreferenser familjen bär (partner + barn).
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.partners()
            .chain(self.child_ids.iter().map(String::as_str))
    }

    /// En familj utan partner och utan barn får inte finnas kvar.
    pub fn is_vacuous(&self) -> bool {
        self.partner1_id.is_none() && self.partner2_id.is_none() && self.child_ids.is_empty()
    }

    /// Ta bort varje förekomst av personen ur partnerplatser och barnlista.
    pub(crate) fn strip_person(&mut self, person_id: &str) {
        if self.partner1_id.as_deref() == Some(person_id) {
            self.partner1_id = None;
        }
        if self.partner2_id.as_deref() == Some(person_id) {
            self.partner2_id = None;
        }
        self.child_ids.retain(|c| c != person_id);
    }
}

/// Fält för en ny familj. Identitet och trädtillhörighet sätts av trädet.
#[derive(Debug, Clone, Default)]
pub struct FamilyFields {
    pub partner1_id: Option<String>,
    pub partner2_id: Option<String>,
    pub child_ids: Vec<String>,
}

/// Partiell uppdatering av en familj.
///
/// Partnerplatserna använder [`Field`] (behåll/rensa/sätt); barnlistan
/// ersätts i sin helhet när den anges.
#[derive(Debug, Clone, Default)]
pub struct FamilyPatch {
    pub partner1_id: Field<String>,
    pub partner2_id: Field<String>,
    pub child_ids: Option<Vec<String>>,
}

impl FamilyPatch {
    /// Referenser som patchen inför (och som därmed måste valideras).
    pub(crate) fn new_references(&self) -> impl Iterator<Item = &str> {
        self.partner1_id
            .as_set()
            .into_iter()
            .chain(self.partner2_id.as_set())
            .map(String::as_str)
            .chain(
                self.child_ids
                    .iter()
                    .flatten()
                    .map(String::as_str),
            )
    }

    pub(crate) fn apply(self, family: &mut Family) {
        self.partner1_id.apply_to(&mut family.partner1_id);
        self.partner2_id.apply_to(&mut family.partner2_id);
        if let Some(child_ids) = self.child_ids {
            family.child_ids = child_ids;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(p1: Option<&str>, p2: Option<&str>, children: &[&str]) -> Family {
        Family::from_fields(
            "t1",
            FamilyFields {
                partner1_id: p1.map(String::from),
                partner2_id: p2.map(String::from),
                child_ids: children.iter().map(|c| c.to_string()).collect(),
            },
        )
    }

    #[test]
    fn test_partners_and_references() {
        let f = family(Some("p1"), Some("p2"), &["c1", "c2"]);
        assert_eq!(f.partners().collect::<Vec<_>>(), vec!["p1", "p2"]);
        assert_eq!(
            f.references().collect::<Vec<_>>(),
            vec!["p1", "p2", "c1", "c2"]
        );
        assert!(f.has_partner("p2"));
        assert!(!f.has_partner("c1"));
        assert!(f.has_child("c1"));

        let ensam = family(None, Some("p2"), &[]);
        assert_eq!(ensam.partners().collect::<Vec<_>>(), vec!["p2"]);
    }

    #[test]
    fn test_is_vacuous() {
        assert!(family(None, None, &[]).is_vacuous());
        assert!(!family(Some("p1"), None, &[]).is_vacuous());
        assert!(!family(None, None, &["c1"]).is_vacuous());
    }

    #[test]
    fn test_strip_person() {
        let mut f = family(Some("p1"), Some("p2"), &["c1", "p1"]);
        f.strip_person("p1");

        assert_eq!(f.partner1_id, None);
        assert_eq!(f.partner2_id, Some("p2".into()));
        assert_eq!(f.child_ids, vec!["c1".to_string()]);
        assert!(!f.is_vacuous());
    }
}
