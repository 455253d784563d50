//! File-backed fallback store for registrations
//!
//! The file holds a JSON object with one fixed key, `registrations`, whose
//! value is the whole array of records, newest first. Every mutation reads
//! the array, changes it and replaces the file atomically (temp file +
//! rename) while holding the store's lock, so all read-modify-write cycles
//! go through this type.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::domain::{DomainError, NewRegistration, Registration, RegistrationChanges};
use crate::utils::time::now_iso;

pub const LOCAL_STORAGE_KEY: &str = "registrations";

enum LoadError {
    Io(std::io::Error),
    Corrupt(String),
}

pub struct LocalRegistrationStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalRegistrationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records. A missing or unreadable file reads as empty;
    /// only mutations move a corrupt file aside.
    pub async fn all(&self) -> Vec<Registration> {
        let _guard = self.lock.lock().await;
        match self.read().await {
            Ok(records) => records,
            Err(LoadError::Io(e)) => {
                tracing::warn!("Failed to read local store {:?}: {}", self.path, e);
                Vec::new()
            }
            Err(LoadError::Corrupt(reason)) => {
                tracing::warn!("Local store {:?} is corrupt: {}", self.path, reason);
                Vec::new()
            }
        }
    }

    /// Assign an id and timestamp, prepend, persist.
    pub async fn append(&self, input: NewRegistration) -> Result<Registration, DomainError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_for_write().await?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        let id = now_ms.max(max_id + 1);

        let record = Registration::from_new(id, now_iso(), input.normalized());
        records.insert(0, record.clone());
        self.write(&records).await?;
        Ok(record)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &RegistrationChanges,
    ) -> Result<Registration, DomainError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_for_write().await?;

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound)?;
        record.apply(changes);
        record.updated_at = Some(now_iso());
        let updated = record.clone();

        self.write(&records).await?;
        Ok(updated)
    }

    pub async fn remove(&self, id: i64) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_for_write().await?;

        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(DomainError::NotFound);
        }

        self.write(&records).await
    }

    /// Path a corrupt file is moved to before the store starts over
    pub fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    async fn read(&self) -> Result<Vec<Registration>, LoadError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LoadError::Io(e)),
        };

        let mut document: BTreeMap<String, serde_json::Value> =
            serde_json::from_slice(&raw).map_err(|e| LoadError::Corrupt(e.to_string()))?;

        match document.remove(LOCAL_STORAGE_KEY) {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| LoadError::Corrupt(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Current records for a read-modify-write cycle. A corrupt file is
    /// moved aside so the write that follows cannot destroy it.
    async fn read_for_write(&self) -> Result<Vec<Registration>, DomainError> {
        match self.read().await {
            Ok(records) => Ok(records),
            Err(LoadError::Io(e)) => Err(DomainError::Storage(format!("{:?}: {}", self.path, e))),
            Err(LoadError::Corrupt(reason)) => {
                let aside = self.quarantine_path();
                tokio::fs::rename(&self.path, &aside)
                    .await
                    .map_err(|e| DomainError::Storage(format!("{:?}: {}", aside, e)))?;
                tracing::error!(
                    "Local store {:?} is corrupt ({}), moved to {:?}",
                    self.path,
                    reason,
                    aside
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write(&self, records: &[Registration]) -> Result<(), DomainError> {
        let mut document = BTreeMap::new();
        document.insert(
            LOCAL_STORAGE_KEY,
            serde_json::to_value(records).map_err(|e| DomainError::Storage(e.to_string()))?,
        );
        let bytes =
            serde_json::to_vec_pretty(&document).map_err(|e| DomainError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Storage(format!("{:?}: {}", parent, e)))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| DomainError::Storage(format!("{:?}: {}", tmp, e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DomainError::Storage(format!("{:?}: {}", self.path, e)))?;

        tracing::debug!("Local store now holds {} registrations", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(team: &str) -> NewRegistration {
        NewRegistration {
            team_name: team.into(),
            leader_name: "Leader".into(),
            email: "leader@example.com".into(),
            mobile: "9876543210".into(),
            college: "College".into(),
            leader_dept: "CS".into(),
            member2_name: "Member".into(),
            member2_email: "member@example.com".into(),
            member2_dept: "CS".into(),
            member3_name: None,
            member3_email: None,
            member3_dept: None,
            project_title: None,
            project_description: None,
            git_link: None,
            notes: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn append_prepends_with_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalRegistrationStore::new(dir.path().join("store.json"));

        let first = store.append(input("First")).await.unwrap();
        let second = store.append(input("Second")).await.unwrap();

        assert!(second.id > first.id);
        let all = store.all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].team_name, "Second");
    }

    #[tokio::test]
    async fn update_and_remove_report_missing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalRegistrationStore::new(dir.path().join("store.json"));
        let record = store.append(input("Team")).await.unwrap();

        let changes = RegistrationChanges {
            notes: Some(Some("late".into())),
            ..Default::default()
        };
        let updated = store.update(record.id, &changes).await.unwrap();
        assert_eq!(updated.notes.as_deref(), Some("late"));
        assert!(updated.updated_at.is_some());

        assert!(matches!(
            store.update(record.id + 1, &changes).await,
            Err(DomainError::NotFound)
        ));
        store.remove(record.id).await.unwrap();
        assert!(matches!(store.remove(record.id).await, Err(DomainError::NotFound)));
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = LocalRegistrationStore::new(&path);
        assert!(store.all().await.is_empty());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_moved_aside_before_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = LocalRegistrationStore::new(&path);
        let record = store.append(input("Recovered")).await.unwrap();

        let aside = dir.path().join("store.json.corrupt");
        assert_eq!(store.quarantine_path(), aside);
        assert_eq!(std::fs::read(&aside).unwrap(), b"{not json");

        let all = store.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, record.id);
    }

    #[tokio::test]
    async fn malformed_array_is_moved_aside_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, br#"{"registrations": [{"id": "x"}]}"#).unwrap();

        let store = LocalRegistrationStore::new(&path);
        store.append(input("Fresh")).await.unwrap();

        assert!(dir.path().join("store.json.corrupt").exists());
        assert_eq!(store.all().await.len(), 1);
    }
}
