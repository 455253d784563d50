//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Validation error with field-level messages
    Validation(String),
    /// Database/persistence error
    Database(String),
    /// External service error (proxy, text generation API)
    External(String),
    /// A remote call did not answer in time
    Timeout(String),
    /// Local fallback storage failed
    Storage(String),
    /// A collaborator needed by the operation is not configured
    NotConfigured(String),
    /// Missing or invalid admin credentials
    Unauthorized,
    /// Operation refused in the current environment
    Forbidden(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::External(msg) => write!(f, "External service error: {}", msg),
            DomainError::Timeout(msg) => write!(f, "Timed out: {}", msg),
            DomainError::Storage(msg) => write!(f, "Local storage error: {}", msg),
            DomainError::NotConfigured(what) => write!(f, "Not configured: {}", what),
            DomainError::Unauthorized => write!(f, "Invalid or missing credentials"),
            DomainError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DomainError::Timeout(e.to_string())
        } else {
            DomainError::External(e.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(format!("JSON error: {}", e))
    }
}
