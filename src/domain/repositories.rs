//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use super::registration::{
    NewRegistration, Registration, RegistrationChanges, RegistrationFilter, RegistrationStatus,
};

/// Repository trait for the remote registrations table
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Find registrations matching the filter, newest first
    async fn find_all(&self, filter: RegistrationFilter) -> Result<Vec<Registration>, DomainError>;

    /// Find a single registration by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DomainError>;

    /// Insert a registration and return the stored row
    async fn create(&self, input: NewRegistration) -> Result<Registration, DomainError>;

    /// Apply a partial update, stamping `updated_at`
    async fn update(&self, id: i64, changes: RegistrationChanges)
    -> Result<Registration, DomainError>;

    /// Delete a registration by ID
    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Set the status of every listed ID in one statement
    async fn update_status_many(
        &self,
        ids: &[i64],
        status: RegistrationStatus,
    ) -> Result<u64, DomainError>;

    /// Delete every listed ID in one statement
    async fn delete_many(&self, ids: &[i64]) -> Result<u64, DomainError>;

    /// `(status, leader_dept)` for every row
    async fn status_and_departments(&self) -> Result<Vec<(String, String)>, DomainError>;

    /// Number of rows in the table
    async fn count(&self) -> Result<u64, DomainError>;
}
