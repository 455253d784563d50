//! Registrant-facing write and read paths
//!
//! Writes go through the `TieredWriter`. Reads prefer the remote table and
//! fall back to the local file when the remote is absent or failing; callers
//! never learn which one answered.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::{
    DomainError, NewRegistration, Registration, RegistrationFilter, RegistrationRepository,
};
use crate::infrastructure::SeaOrmRegistrationRepository;
use crate::infrastructure::config::Config;
use crate::infrastructure::local_store::LocalRegistrationStore;
use crate::infrastructure::proxy_client::ProxyClient;
use crate::services::write_tiers::{DatabaseTier, LocalTier, ProxyTier, TieredWriter, WriteTier};

pub struct RegistrationService {
    writer: TieredWriter,
    repo: Option<Arc<dyn RegistrationRepository>>,
    local: Arc<LocalRegistrationStore>,
}

impl RegistrationService {
    pub fn new(
        writer: TieredWriter,
        repo: Option<Arc<dyn RegistrationRepository>>,
        local: Arc<LocalRegistrationStore>,
    ) -> Self {
        Self {
            writer,
            repo,
            local,
        }
    }

    /// Assemble the tiers enabled by the configuration: proxy when
    /// `API_BASE_URL` is set, database when a connection is open, local file
    /// always.
    pub fn from_config(config: &Config, db: Option<DatabaseConnection>) -> Result<Self, DomainError> {
        let local = Arc::new(LocalRegistrationStore::new(config.local_store_path.clone()));
        let repo: Option<Arc<dyn RegistrationRepository>> = db
            .map(|db| Arc::new(SeaOrmRegistrationRepository::new(db)) as Arc<dyn RegistrationRepository>);

        let mut tiers: Vec<Arc<dyn WriteTier>> = Vec::new();
        if let Some(base_url) = &config.api_base_url {
            let client = ProxyClient::new(base_url.clone(), config.request_timeout)?;
            tiers.push(Arc::new(ProxyTier::new(client, config.request_timeout)));
        }
        if let Some(repo) = &repo {
            tiers.push(Arc::new(DatabaseTier::new(repo.clone(), config.request_timeout)));
        }
        tiers.push(Arc::new(LocalTier::new(local.clone())));

        let writer = TieredWriter::new(tiers);
        tracing::info!("Registration write tiers: {:?}", writer.tier_names());

        Ok(Self::new(writer, repo, local))
    }

    pub fn repository(&self) -> Option<&Arc<dyn RegistrationRepository>> {
        self.repo.as_ref()
    }

    pub fn local_store(&self) -> &Arc<LocalRegistrationStore> {
        &self.local
    }

    /// Store a new team through the first tier that accepts it
    pub async fn register(&self, payload: NewRegistration) -> Result<Registration, DomainError> {
        self.writer.write(payload).await
    }

    pub async fn list(&self, search: &str, dept: &str) -> Result<Vec<Registration>, DomainError> {
        let filter = RegistrationFilter::new(search, dept);

        if let Some(repo) = &self.repo {
            match repo.find_all(filter.clone()).await {
                Ok(records) => return Ok(records),
                Err(e) => tracing::warn!("Remote read failed, using local store: {}", e),
            }
        }

        let mut records: Vec<Registration> = self
            .local
            .all()
            .await
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Registration, DomainError> {
        if let Some(repo) = &self.repo {
            match repo.find_by_id(id).await {
                Ok(Some(record)) => return Ok(record),
                Ok(None) => {}
                Err(e) => tracing::warn!("Remote lookup of {} failed: {}", id, e),
            }
        }

        self.local
            .all()
            .await
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound)
    }
}
