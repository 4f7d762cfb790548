use thiserror::Error;

/// Fel från modellens operationer på en träd-snapshot.
///
/// En tom familj (utan partner och barn) är inget fel, utan rensas
/// automatiskt bort av operationen som skapade tillståndet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Hittades inte: {0}")]
    NotFound(String),

    #[error("Ogiltig referens: {0}")]
    InvalidReference(String),
}

impl ModelError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
