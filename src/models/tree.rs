//! Släktträdet som snapshot: äger personer och familjer och utför alla
//! muterande operationer med referensvalidering och kaskadsäker radering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::{ModelError, ModelResult};

use super::{Family, FamilyFields, FamilyPatch, Person, PersonFields, PersonPatch};

/// Ett komplett släktträd i minnet.
///
/// Vektorordningen för personer och familjer är snapshotens
/// insättningsordning och används som layoutmotorns ordningsregel vid
/// lika rang. Ett fel från en operation lämnar trädet oförändrat:
/// validering sker innan något skrivs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyTree {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub persons: Vec<Person>,
    pub families: Vec<Family>,
}

impl FamilyTree {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            persons: Vec::new(),
            families: Vec::new(),
        }
    }

    pub fn find_person(&self, person_id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == person_id)
    }

    pub fn find_family(&self, family_id: &str) -> Option<&Family> {
        self.families.iter().find(|f| f.id == family_id)
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Stämpla trädet som ändrat. Klockan får aldrig gå bakåt; vid
    /// kollision på samma tidsstämpel behålls den gamla.
    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Lägg till en ny person med färskt id.
    pub fn add_person(&mut self, fields: PersonFields) -> &Person {
        let person = Person::from_fields(&self.id, fields);
        self.persons.push(person);
        self.touch();
        self.persons.last().expect("nyss tillagd")
    }

    /// Uppdatera en person med en partiell patch.
    pub fn update_person(&mut self, person_id: &str, patch: PersonPatch) -> ModelResult<()> {
        let person = self
            .persons
            .iter_mut()
            .find(|p| p.id == person_id)
            .ok_or_else(|| ModelError::not_found(format!("person {}", person_id)))?;

        patch.apply(person);
        self.touch();
        Ok(())
    }

    /// Ta bort en person. Referenser till personen stryks ur varje
    /// familjs partnerplatser och barnlista, och familjer som blir helt
    /// tomma rensas bort.
    pub fn delete_person(&mut self, person_id: &str) -> ModelResult<()> {
        let before = self.persons.len();
        self.persons.retain(|p| p.id != person_id);
        if self.persons.len() == before {
            return Err(ModelError::not_found(format!("person {}", person_id)));
        }

        for family in &mut self.families {
            family.strip_person(person_id);
        }
        self.purge_vacuous_families();
        self.touch();
        Ok(())
    }

    /// Lägg till en familj. Varje angiven referens måste peka på en
    /// person i trädet. En begäran utan partner och utan barn skulle
    /// direkt rensas som tom: posten returneras men behålls inte.
    pub fn add_family(&mut self, fields: FamilyFields) -> ModelResult<Family> {
        let refs: Vec<&str> = fields
            .partner1_id
            .as_deref()
            .into_iter()
            .chain(fields.partner2_id.as_deref())
            .chain(fields.child_ids.iter().map(String::as_str))
            .collect();
        self.validate_references(refs.into_iter())?;

        let family = Family::from_fields(&self.id, fields);
        if !family.is_vacuous() {
            self.families.push(family.clone());
        }
        self.touch();
        Ok(family)
    }

    /// Uppdatera en familj. Nya referenser valideras; en familj som blir
    /// tom efter uppdateringen rensas bort.
    pub fn update_family(&mut self, family_id: &str, patch: FamilyPatch) -> ModelResult<()> {
        if !self.families.iter().any(|f| f.id == family_id) {
            return Err(ModelError::not_found(format!("familj {}", family_id)));
        }
        self.validate_references(patch.new_references())?;

        let family = self
            .families
            .iter_mut()
            .find(|f| f.id == family_id)
            .expect("kontrollerad ovan");
        patch.apply(family);

        self.purge_vacuous_families();
        self.touch();
        Ok(())
    }

    /// Ta bort en familj. Personerna lämnas orörda.
    pub fn delete_family(&mut self, family_id: &str) -> ModelResult<()> {
        let before = self.families.len();
        self.families.retain(|f| f.id != family_id);
        if self.families.len() == before {
            return Err(ModelError::not_found(format!("familj {}", family_id)));
        }
        self.touch();
        Ok(())
    }

    fn validate_references<'a>(&self, refs: impl Iterator<Item = &'a str>) -> ModelResult<()> {
        for person_id in refs {
            if self.find_person(person_id).is_none() {
                return Err(ModelError::invalid_reference(format!(
                    "person {} finns inte i trädet",
                    person_id
                )));
            }
        }
        Ok(())
    }

    fn purge_vacuous_families(&mut self) {
        self.families.retain(|f| !f.is_vacuous());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, Gender};
    use std::collections::HashSet;

    fn tree_with_persons(names: &[&str]) -> (FamilyTree, Vec<String>) {
        let mut tree = FamilyTree::new("Testträd");
        let ids = names
            .iter()
            .map(|n| tree.add_person(PersonFields::named(*n, "Testsson")).id.clone())
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_add_person_unique_ids_and_updated_at() {
        let mut tree = FamilyTree::new("Testträd");
        let before = tree.updated_at;

        let mut seen = HashSet::new();
        for i in 0..20 {
            let id = tree
                .add_person(PersonFields::named(format!("Person{}", i), ""))
                .id
                .clone();
            assert!(seen.insert(id), "id måste vara unikt inom trädet");
        }

        assert_eq!(tree.person_count(), 20);
        assert!(tree.updated_at >= before);
    }

    #[test]
    fn test_update_person_patch_and_not_found() {
        let (mut tree, ids) = tree_with_persons(&["Johan"]);

        tree.update_person(
            &ids[0],
            PersonPatch {
                gender: Some(Gender::Male),
                birth_date: Field::Set("1850".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let johan = tree.find_person(&ids[0]).unwrap();
        assert_eq!(johan.gender, Gender::Male);
        assert_eq!(johan.birth_date, Some("1850".into()));
        // Oangivna fält lämnas orörda
        assert_eq!(johan.firstname, "Johan");

        let err = tree.update_person("saknas", PersonPatch::default());
        assert!(matches!(err, Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_add_family_validates_references() {
        let (mut tree, ids) = tree_with_persons(&["Johan", "Anna"]);

        let err = tree.add_family(FamilyFields {
            partner1_id: Some(ids[0].clone()),
            partner2_id: Some("spöke".into()),
            child_ids: vec![],
        });
        assert!(matches!(err, Err(ModelError::InvalidReference(_))));
        assert_eq!(tree.family_count(), 0, "felet får inte lämna spår");

        let err = tree.add_family(FamilyFields {
            partner1_id: Some(ids[0].clone()),
            partner2_id: Some(ids[1].clone()),
            child_ids: vec!["spökbarn".into()],
        });
        assert!(matches!(err, Err(ModelError::InvalidReference(_))));

        let fam = tree
            .add_family(FamilyFields {
                partner1_id: Some(ids[0].clone()),
                partner2_id: Some(ids[1].clone()),
                child_ids: vec![],
            })
            .unwrap();
        assert_eq!(tree.family_count(), 1);
        assert_eq!(tree.find_family(&fam.id).unwrap().partner1_id, Some(ids[0].clone()));
    }

    #[test]
    fn test_add_vacuous_family_not_retained() {
        let mut tree = FamilyTree::new("Testträd");
        let fam = tree.add_family(FamilyFields::default()).unwrap();

        // Posten returneras men en helt tom familj behålls inte
        assert!(fam.is_vacuous());
        assert_eq!(tree.family_count(), 0);
    }

    #[test]
    fn test_update_family_purges_vacuous() {
        let (mut tree, ids) = tree_with_persons(&["Johan"]);
        let fam_id = tree
            .add_family(FamilyFields {
                partner1_id: Some(ids[0].clone()),
                ..Default::default()
            })
            .unwrap()
            .id;

        tree.update_family(
            &fam_id,
            FamilyPatch {
                partner1_id: Field::Clear,
                ..Default::default()
            },
        )
        .unwrap();

        // Familjen blev tom och ska vara borta
        assert!(tree.find_family(&fam_id).is_none());
    }

    #[test]
    fn test_update_family_rejects_dangling_child() {
        let (mut tree, ids) = tree_with_persons(&["Johan", "Anna"]);
        let fam_id = tree
            .add_family(FamilyFields {
                partner1_id: Some(ids[0].clone()),
                ..Default::default()
            })
            .unwrap()
            .id;

        let err = tree.update_family(
            &fam_id,
            FamilyPatch {
                child_ids: Some(vec![ids[1].clone(), "spöke".into()]),
                ..Default::default()
            },
        );
        assert!(matches!(err, Err(ModelError::InvalidReference(_))));
        // Familjen är oförändrad
        assert!(tree.find_family(&fam_id).unwrap().child_ids.is_empty());

        let err = tree.update_family("saknas", FamilyPatch::default());
        assert!(matches!(err, Err(ModelError::NotFound(_))));
    }

    /// Scenario C: partnern tas bort, familjen behåller kvarvarande
    /// partner och barn.
    #[test]
    fn test_delete_person_strips_references() {
        let (mut tree, ids) = tree_with_persons(&["P1", "P2", "C"]);
        let fam_id = tree
            .add_family(FamilyFields {
                partner1_id: Some(ids[0].clone()),
                partner2_id: Some(ids[1].clone()),
                child_ids: vec![ids[2].clone()],
            })
            .unwrap()
            .id;

        tree.delete_person(&ids[1]).unwrap();

        let fam = tree.find_family(&fam_id).unwrap();
        assert_eq!(fam.partner1_id, Some(ids[0].clone()));
        assert_eq!(fam.partner2_id, None);
        assert_eq!(fam.child_ids, vec![ids[2].clone()]);
    }

    /// Scenario D: när båda partnerna och barnet försvunnit ur familjen
    /// rensas den bort helt.
    #[test]
    fn test_delete_person_purges_vacuous_family() {
        let (mut tree, ids) = tree_with_persons(&["P1", "P2", "C"]);
        let fam_id = tree
            .add_family(FamilyFields {
                partner1_id: Some(ids[0].clone()),
                partner2_id: Some(ids[1].clone()),
                child_ids: vec![ids[2].clone()],
            })
            .unwrap()
            .id;

        tree.delete_person(&ids[0]).unwrap();
        tree.delete_person(&ids[1]).unwrap();
        assert!(
            tree.find_family(&fam_id).is_some(),
            "barnet håller familjen vid liv"
        );

        tree.delete_person(&ids[2]).unwrap();
        assert!(tree.find_family(&fam_id).is_none());
        assert_eq!(tree.family_count(), 0);
    }

    #[test]
    fn test_delete_person_twice_fails() {
        let (mut tree, ids) = tree_with_persons(&["Johan"]);
        tree.delete_person(&ids[0]).unwrap();
        assert!(matches!(
            tree.delete_person(&ids[0]),
            Err(ModelError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_family_no_cascade() {
        let (mut tree, ids) = tree_with_persons(&["P1", "C"]);
        let fam_id = tree
            .add_family(FamilyFields {
                partner1_id: Some(ids[0].clone()),
                partner2_id: None,
                child_ids: vec![ids[1].clone()],
            })
            .unwrap()
            .id;

        tree.delete_family(&fam_id).unwrap();
        assert_eq!(tree.family_count(), 0);
        // Personerna finns kvar
        assert_eq!(tree.person_count(), 2);

        assert!(matches!(
            tree.delete_family(&fam_id),
            Err(ModelError::NotFound(_))
        ));
    }

    #[test]
    fn test_updated_at_never_decreases() {
        let (mut tree, ids) = tree_with_persons(&["Johan"]);
        let mut last = tree.updated_at;

        for _ in 0..10 {
            tree.update_person(&ids[0], PersonPatch::default()).unwrap();
            assert!(tree.updated_at >= last);
            last = tree.updated_at;
        }
    }
}
