pub mod family;
pub mod person;
pub mod tree;

pub use family::*;
pub use person::*;
pub use tree::*;

/// Ett fält i en partiell uppdatering: behåll, rensa eller sätt nytt värde.
///
/// Skiljer "inte angivet" (behåll) från "uttryckligen tomt" (rensa).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Field<T> {
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }

    /// Värdet om fältet sätter ett nytt, annars `None`.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }
}
