//! Domain errors

use thiserror::Error;

/// Domain-level error types.
///
/// Every variant is terminal for the operation that produced it; callers
/// surface the message to the user and let them retry by hand.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown email and wrong password share this variant on purpose.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateEmail(String),

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation: {0}")]
    Validation(String),

    /// The collection changed between read and write.
    #[error("Collection {0} was modified concurrently")]
    StoreConflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn plant_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Plant",
            field: "id",
            value: id.into(),
        }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "User",
            field: "id",
            value: id.into(),
        }
    }

    /// Whether the operation may succeed if simply re-run.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::StoreConflict(_))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Storage(format!("Serialization error: {}", e))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
