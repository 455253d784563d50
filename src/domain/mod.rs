//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only domain types, trait definitions and domain error types.

pub mod errors;
pub mod registration;
pub mod repositories;

pub use errors::DomainError;
pub use registration::*;
pub use repositories::*;
