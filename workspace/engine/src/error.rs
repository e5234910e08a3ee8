use thiserror::Error;

use crate::season::SeasonViolation;

/// Error types for the league engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A league, team, match or standing id did not resolve
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// A season or roster precondition was not met
    #[error("Validation failed: {0}")]
    Validation(#[from] SeasonViolation),

    /// A standings revert did not match any prior apply
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
}

/// Coarse classification of [`EngineError`] used by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    InconsistentState,
    Internal,
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        EngineError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Database(_) => ErrorKind::Internal,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Validation(_) => ErrorKind::ValidationFailed,
            EngineError::InconsistentState(_) => ErrorKind::InconsistentState,
        }
    }
}

/// Type alias for Result with EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
