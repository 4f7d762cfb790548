/// SQL-schema för Antavla
///
/// Träden äger sina personer och familjer: radering av ett träd
/// kaskadraderar allt innehåll. Rad-ordningen (rowid respektive
/// position) bevarar snapshotens insättningsordning över en
/// spara/ladda-cykel.

pub const SCHEMA_VERSION: i32 = 1;

pub const CREATE_TABLES: &str = r#"
-- Släktträd
CREATE TABLE IF NOT EXISTS trees (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_trees_updated ON trees(updated_at);

-- Personer
CREATE TABLE IF NOT EXISTS persons (
    id TEXT PRIMARY KEY,
    tree_id TEXT NOT NULL,
    firstname TEXT NOT NULL DEFAULT '',
    surname TEXT NOT NULL DEFAULT '',
    birth_date TEXT,
    birth_place TEXT,
    death_date TEXT,
    death_place TEXT,
    gender TEXT NOT NULL DEFAULT 'U',
    photo_url TEXT,
    notes TEXT,
    FOREIGN KEY (tree_id) REFERENCES trees(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_persons_tree ON persons(tree_id);

-- Familjer
CREATE TABLE IF NOT EXISTS families (
    id TEXT PRIMARY KEY,
    tree_id TEXT NOT NULL,
    partner1_id TEXT,
    partner2_id TEXT,
    FOREIGN KEY (tree_id) REFERENCES trees(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_families_tree ON families(tree_id);

-- Barn per familj, i bevarad ordning
CREATE TABLE IF NOT EXISTS family_children (
    family_id TEXT NOT NULL,
    child_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (family_id, position),
    FOREIGN KEY (family_id) REFERENCES families(id) ON DELETE CASCADE
);

-- Migrationshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
