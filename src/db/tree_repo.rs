//! Lagring av hela träd: repositoryt läser och skriver alltid en
//! komplett snapshot (trädet med alla personer och familjer) som en
//! enhet, med sista-skrivaren-vinner-semantik.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{Family, FamilyTree, Gender, Person};

pub struct TreeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TreeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Skapa ett nytt tomt träd och spara det
    pub fn create(&self, name: &str) -> Result<FamilyTree> {
        let tree = FamilyTree::new(name);
        self.save(&tree)?;
        Ok(tree)
    }

    /// Hämta alla träd, senast ändrade först
    pub fn find_all(&self) -> Result<Vec<FamilyTree>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM trees
             ORDER BY updated_at DESC",
        )?;

        let mut trees: Vec<FamilyTree> = stmt
            .query_map([], |row| Self::row_to_tree(row))?
            .filter_map(|r| r.ok())
            .collect();

        for tree in &mut trees {
            Self::load_contents(&conn, tree)?;
        }

        Ok(trees)
    }

    /// Hämta träd via ID, med hela innehållet
    pub fn find_by_id(&self, id: &str) -> Result<Option<FamilyTree>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM trees
             WHERE id = ?",
        )?;

        let tree = stmt.query_row([id], |row| Self::row_to_tree(row)).ok();

        let Some(mut tree) = tree else {
            return Ok(None);
        };
        Self::load_contents(&conn, &mut tree)?;
        Ok(Some(tree))
    }

    /// Spara hela trädet i en transaktion. Befintligt innehåll för
    /// trädet ersätts rad för rad i snapshotens ordning.
    pub fn save(&self, tree: &FamilyTree) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO trees (id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = ?2, updated_at = ?4",
            params![tree.id, tree.name, tree.created_at, tree.updated_at],
        )?;

        tx.execute("DELETE FROM persons WHERE tree_id = ?", [&tree.id])?;
        tx.execute("DELETE FROM families WHERE tree_id = ?", [&tree.id])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO persons (id, tree_id, firstname, surname, birth_date, birth_place,
                                      death_date, death_place, gender, photo_url, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for person in &tree.persons {
                stmt.execute(params![
                    person.id,
                    person.tree_id,
                    person.firstname,
                    person.surname,
                    person.birth_date,
                    person.birth_place,
                    person.death_date,
                    person.death_place,
                    person.gender.as_gedcom(),
                    person.photo_url,
                    person.notes,
                ])?;
            }

            let mut fam_stmt = tx.prepare(
                "INSERT INTO families (id, tree_id, partner1_id, partner2_id)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut child_stmt = tx.prepare(
                "INSERT INTO family_children (family_id, child_id, position)
                 VALUES (?1, ?2, ?3)",
            )?;
            for family in &tree.families {
                fam_stmt.execute(params![
                    family.id,
                    family.tree_id,
                    family.partner1_id,
                    family.partner2_id,
                ])?;
                for (position, child_id) in family.child_ids.iter().enumerate() {
                    child_stmt.execute(params![family.id, child_id, position as i64])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Byt namn på ett träd
    pub fn rename(&self, id: &str, name: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE trees SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name, Utc::now(), id],
        )?;

        if rows == 0 {
            return Err(anyhow!("Träd med ID {} hittades inte", id));
        }

        Ok(())
    }

    /// Ta bort ett träd med allt innehåll
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM trees WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(anyhow!("Träd med ID {} hittades inte", id));
        }

        Ok(())
    }

    /// Räkna antal träd
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM trees", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_tree(row: &Row) -> rusqlite::Result<FamilyTree> {
        Ok(FamilyTree {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get::<_, DateTime<Utc>>(2)?,
            updated_at: row.get::<_, DateTime<Utc>>(3)?,
            persons: Vec::new(),
            families: Vec::new(),
        })
    }

    /// Ladda personer och familjer i insättningsordning (rowid
    /// respektive position), så snapshotens ordning överlever lagringen.
    fn load_contents(conn: &Connection, tree: &mut FamilyTree) -> Result<()> {
        let mut stmt = conn.prepare(
            "SELECT id, tree_id, firstname, surname, birth_date, birth_place,
                    death_date, death_place, gender, photo_url, notes
             FROM persons
             WHERE tree_id = ?
             ORDER BY rowid",
        )?;
        tree.persons = stmt
            .query_map([&tree.id], |row| Self::row_to_person(row))?
            .filter_map(|r| r.ok())
            .collect();

        let mut fam_stmt = conn.prepare(
            "SELECT id, tree_id, partner1_id, partner2_id
             FROM families
             WHERE tree_id = ?
             ORDER BY rowid",
        )?;
        let mut families: Vec<Family> = fam_stmt
            .query_map([&tree.id], |row| {
                Ok(Family {
                    id: row.get(0)?,
                    tree_id: row.get(1)?,
                    partner1_id: row.get(2)?,
                    partner2_id: row.get(3)?,
                    child_ids: Vec::new(),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        let mut child_stmt = conn.prepare(
            "SELECT child_id FROM family_children
             WHERE family_id = ?
             ORDER BY position",
        )?;
        for family in &mut families {
            family.child_ids = child_stmt
                .query_map([&family.id], |row| row.get::<_, String>(0))?
                .filter_map(|r| r.ok())
                .collect();
        }

        tree.families = families;
        Ok(())
    }

    fn row_to_person(row: &Row) -> rusqlite::Result<Person> {
        Ok(Person {
            id: row.get(0)?,
            tree_id: row.get(1)?,
            firstname: row.get(2)?,
            surname: row.get(3)?,
            birth_date: row.get(4)?,
            birth_place: row.get(5)?,
            death_date: row.get(6)?,
            death_place: row.get(7)?,
            gender: Gender::from_gedcom(&row.get::<_, String>(8)?),
            photo_url: row.get(9)?,
            notes: row.get(10)?,
        })
    }
}
