//! Relationsindex: härledda uppslag (partner, barn, föräldrar) beräknade
//! ur en träd-snapshot.
//!
//! Indexet är en ren projektion utan eget tillstånd: det byggs om från
//! aktuella person- och familjesamlingar vid behov och muterar aldrig
//! trädet. Okända id:n ger tomma svar i stället för fel.

use std::collections::{BTreeSet, HashMap};

use crate::models::FamilyTree;

#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    partners: HashMap<String, BTreeSet<String>>,
    families_as_partner: HashMap<String, BTreeSet<String>>,
    families_as_child: HashMap<String, BTreeSet<String>>,
    children: HashMap<String, Vec<String>>,
}

impl RelationIndex {
    pub fn build(tree: &FamilyTree) -> Self {
        let mut index = Self::default();

        for family in &tree.families {
            let partners: Vec<&str> = family.partners().collect();

            for &partner in &partners {
                index
                    .families_as_partner
                    .entry(partner.to_string())
                    .or_default()
                    .insert(family.id.clone());

                for &other in &partners {
                    if other != partner {
                        index
                            .partners
                            .entry(partner.to_string())
                            .or_default()
                            .insert(other.to_string());
                    }
                }
            }

            for child in &family.child_ids {
                index
                    .families_as_child
                    .entry(child.clone())
                    .or_default()
                    .insert(family.id.clone());
            }

            index
                .children
                .insert(family.id.clone(), family.child_ids.clone());
        }

        index
    }

    /// Personer som delar partnerplats med personen i någon familj.
    pub fn partners_of(&self, person_id: &str) -> BTreeSet<String> {
        self.partners.get(person_id).cloned().unwrap_or_default()
    }

    /// Familjer där personen upptar någon av partnerplatserna.
    pub fn families_as_partner(&self, person_id: &str) -> BTreeSet<String> {
        self.families_as_partner
            .get(person_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Familjer där personen står som barn.
    pub fn families_as_child(&self, person_id: &str) -> BTreeSet<String> {
        self.families_as_child
            .get(person_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Familjens barn i lagrad ordning.
    pub fn children_of(&self, family_id: &str) -> &[String] {
        self.children
            .get(family_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Partner i familjer där personen står som barn.
    pub fn parents_of(&self, person_id: &str, tree: &FamilyTree) -> BTreeSet<String> {
        let mut parents = BTreeSet::new();
        for family_id in self.families_as_child(person_id) {
            if let Some(family) = tree.find_family(&family_id) {
                for partner in family.partners() {
                    parents.insert(partner.to_string());
                }
            }
        }
        parents
    }

    /// Möjliga nya partner: alla personer i trädet utom personen själv
    /// och redan registrerade partner. Ordningen följer snapshoten.
    pub fn partner_candidates(&self, tree: &FamilyTree, person_id: &str) -> Vec<String> {
        let existing = self.partners_of(person_id);
        tree.persons
            .iter()
            .filter(|p| p.id != person_id && !existing.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }
}
