//! Admin CRUD surface over the remote registration table
//!
//! Admin operations never touch the local fallback file. Without a remote
//! store every call fails with `NotConfigured`. Single-row changes append an
//! audit entry; a failed audit write is logged and does not fail the change.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::{
    DomainError, NewRegistration, Registration, RegistrationChanges, RegistrationFilter, RegistrationRepository,
    RegistrationStats, RegistrationStatus,
};
use crate::infrastructure::SeaOrmRegistrationRepository;
use crate::services::audit_service;

#[derive(Clone)]
pub struct AdminService {
    repo: Option<Arc<dyn RegistrationRepository>>,
    db: Option<DatabaseConnection>,
}

impl AdminService {
    pub fn new(repo: Option<Arc<dyn RegistrationRepository>>, db: Option<DatabaseConnection>) -> Self {
        Self { repo, db }
    }

    pub fn from_db(db: Option<DatabaseConnection>) -> Self {
        let repo = db.clone().map(|db| {
            Arc::new(SeaOrmRegistrationRepository::new(db)) as Arc<dyn RegistrationRepository>
        });
        Self::new(repo, db)
    }

    fn repo(&self) -> Result<&Arc<dyn RegistrationRepository>, DomainError> {
        self.repo
            .as_ref()
            .ok_or_else(|| DomainError::NotConfigured("remote registration store".to_string()))
    }

    pub async fn list(&self, search: &str, dept: &str) -> Result<Vec<Registration>, DomainError> {
        self.repo()?
            .find_all(RegistrationFilter::new(search, dept))
            .await
    }

    /// Validated insert into the remote table, audited as `CREATE`
    pub async fn create(
        &self,
        payload: NewRegistration,
        actor: Option<i64>,
    ) -> Result<Registration, DomainError> {
        payload.validate()?;
        let record = self.repo()?.create(payload).await?;

        if let Some(db) = &self.db
            && let Err(e) = audit_service::log_registration_created(db, &record, actor).await
        {
            tracing::warn!("Audit entry for registration {} not written: {}", record.id, e);
        }

        tracing::info!("Registration {} created for '{}'", record.id, record.team_name);
        Ok(record)
    }

    /// Partial update. Content edits are checked against the same rules as a
    /// new registration, applied to the stored row.
    pub async fn update(
        &self,
        id: i64,
        changes: RegistrationChanges,
        actor: Option<i64>,
    ) -> Result<Registration, DomainError> {
        let repo = self.repo()?;
        let before = repo.find_by_id(id).await?.ok_or(DomainError::NotFound)?;

        let content = RegistrationChanges {
            status: None,
            ..changes.clone()
        };
        if !content.is_empty() {
            let mut edited = before.clone();
            edited.apply(&changes);
            NewRegistration::from(edited).validate()?;
        }

        let after = repo.update(id, changes).await?;

        if let Some(db) = &self.db
            && let Err(e) = audit_service::log_registration_updated(db, &before, &after, actor).await
        {
            tracing::warn!("Audit entry for registration {} not written: {}", id, e);
        }

        Ok(after)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: RegistrationStatus,
        actor: Option<i64>,
    ) -> Result<Registration, DomainError> {
        self.update(id, RegistrationChanges::status(status), actor)
            .await
    }

    pub async fn delete(&self, id: i64, actor: Option<i64>) -> Result<(), DomainError> {
        let repo = self.repo()?;
        let before = repo.find_by_id(id).await?.ok_or(DomainError::NotFound)?;
        repo.delete(id).await?;

        if let Some(db) = &self.db
            && let Err(e) = audit_service::log_registration_deleted(db, &before, actor).await
        {
            tracing::warn!("Audit entry for registration {} not written: {}", id, e);
        }

        Ok(())
    }

    /// One `IN (...)` update; ids that do not exist are ignored
    pub async fn bulk_update_status(
        &self,
        ids: &[i64],
        status: RegistrationStatus,
    ) -> Result<u64, DomainError> {
        let affected = self.repo()?.update_status_many(ids, status).await?;
        tracing::info!(
            "Bulk status '{}' applied to {} of {} registrations",
            status,
            affected,
            ids.len()
        );
        Ok(affected)
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, DomainError> {
        let affected = self.repo()?.delete_many(ids).await?;
        tracing::info!("Bulk delete removed {} of {} registrations", affected, ids.len());
        Ok(affected)
    }

    pub async fn stats(&self) -> Result<RegistrationStats, DomainError> {
        let rows = self.repo()?.status_and_departments().await?;
        Ok(RegistrationStats::from_rows(
            rows.iter().map(|(status, dept)| (status.as_str(), dept.as_str())),
        ))
    }
}
