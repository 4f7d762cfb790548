//! GEDCOM-hantering för import av släktdata
//!
//! Stöder GEDCOM 5.5-format. Importen producerar en komplett
//! träd-snapshot där varje partner- och barnreferens garanterat pekar
//! på en person i samma snapshot.

pub mod importer;
pub mod models;
pub mod parser;

pub use importer::{GedcomImporter, ImportResult, ImportedTree};
pub use models::*;
pub use parser::GedcomParser;
