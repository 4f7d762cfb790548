//! Antavla - släktträdsmodell med automatisk diagramlayout
//!
//! Kärnan arbetar på en träd-snapshot i minnet: modelloperationerna
//! tar en snapshot och lämnar en ny (eller ett fel), relationsindexet
//! är en ren projektion av snapshoten och layoutmotorn omvandlar den
//! till ett positionerat nod/kant-diagram. Lagring (SQLite), import
//! (GEDCOM) och export (JSON/CSV) är kringtjänster runt kärnan.

pub mod db;
pub mod gedcom;
pub mod models;
pub mod services;
pub mod utils;

// Re-exports
pub use db::Database;
pub use models::*;
pub use services::{build_tree_layout, RelationIndex, TreeLayout, TreeLayoutEngine};
pub use utils::error::{ModelError, ModelResult};
