//! Ordered write strategies for registrant submissions
//!
//! A `TieredWriter` tries each `WriteTier` in order and returns the first
//! record produced. Every tier except the last is allowed to fail; the last
//! tier's error is what the caller sees.
//!
//! A timed-out tier is abandoned by dropping its future. The request may
//! already have reached the remote side and can still be applied there, so a
//! slow remote can end up holding a row that was also written by a later
//! tier.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{DomainError, NewRegistration, Registration, RegistrationRepository};
use crate::infrastructure::local_store::LocalRegistrationStore;
use crate::infrastructure::proxy_client::ProxyClient;

#[async_trait]
pub trait WriteTier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Upper bound on one attempt; `None` waits for completion
    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn create(&self, payload: &NewRegistration) -> Result<Registration, DomainError>;
}

/// POST to an upstream proxy
pub struct ProxyTier {
    client: ProxyClient,
    timeout: Duration,
}

impl ProxyTier {
    pub fn new(client: ProxyClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl WriteTier for ProxyTier {
    fn name(&self) -> &'static str {
        "proxy"
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn create(&self, payload: &NewRegistration) -> Result<Registration, DomainError> {
        self.client.create_registration(payload).await
    }
}

/// Direct insert into the remote table
pub struct DatabaseTier {
    repo: Arc<dyn RegistrationRepository>,
    timeout: Duration,
}

impl DatabaseTier {
    pub fn new(repo: Arc<dyn RegistrationRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }
}

#[async_trait]
impl WriteTier for DatabaseTier {
    fn name(&self) -> &'static str {
        "database"
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn create(&self, payload: &NewRegistration) -> Result<Registration, DomainError> {
        self.repo.create(payload.clone()).await
    }
}

/// Local fallback file
pub struct LocalTier {
    store: Arc<LocalRegistrationStore>,
}

impl LocalTier {
    pub fn new(store: Arc<LocalRegistrationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WriteTier for LocalTier {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn create(&self, payload: &NewRegistration) -> Result<Registration, DomainError> {
        self.store.append(payload.clone()).await
    }
}

pub struct TieredWriter {
    tiers: Vec<Arc<dyn WriteTier>>,
}

impl TieredWriter {
    pub fn new(tiers: Vec<Arc<dyn WriteTier>>) -> Self {
        Self { tiers }
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    /// Validate, default the status, then try each tier in order
    pub async fn write(&self, payload: NewRegistration) -> Result<Registration, DomainError> {
        payload.validate()?;
        let payload = payload.normalized();

        let mut last_error = DomainError::NotConfigured("no registration write tier".to_string());

        for tier in &self.tiers {
            let attempt = match tier.timeout() {
                Some(limit) => match tokio::time::timeout(limit, tier.create(&payload)).await {
                    Ok(result) => result,
                    Err(_) => Err(DomainError::Timeout(format!(
                        "{} tier did not answer within {:?}",
                        tier.name(),
                        limit
                    ))),
                },
                None => tier.create(&payload).await,
            };

            match attempt {
                Ok(record) => {
                    tracing::info!(
                        tier = tier.name(),
                        id = record.id,
                        "Registration stored for team '{}'",
                        record.team_name
                    );
                    return Ok(record);
                }
                Err(e) => {
                    tracing::warn!(tier = tier.name(), "Registration write failed: {}", e);
                    last_error = e;
                }
            }
        }

        tracing::error!("Every registration tier failed: {}", last_error);
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        name: &'static str,
        outcome: Result<i64, ()>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(name: &'static str, id: i64) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome: Ok(id),
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome: Err(()),
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(name: &'static str, id: i64, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome: Ok(id),
                delay: Some(delay),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl WriteTier for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn timeout(&self) -> Option<Duration> {
            self.delay.map(|_| Duration::from_millis(20))
        }

        async fn create(&self, payload: &NewRegistration) -> Result<Registration, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.outcome {
                Ok(id) => Ok(Registration::from_new(
                    id,
                    "2026-01-01T00:00:00.000Z".into(),
                    payload.clone(),
                )),
                Err(()) => Err(DomainError::External(format!("{} down", self.name))),
            }
        }
    }

    fn chain(tiers: &[&Arc<Scripted>]) -> TieredWriter {
        TieredWriter::new(
            tiers
                .iter()
                .map(|t| Arc::clone(*t) as Arc<dyn WriteTier>)
                .collect(),
        )
    }

    fn payload() -> NewRegistration {
        NewRegistration {
            team_name: "Byte Busters".into(),
            leader_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            mobile: "9876543210".into(),
            college: "City College".into(),
            leader_dept: "CS".into(),
            member2_name: "Ravi Kumar".into(),
            member2_email: "ravi@example.com".into(),
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
    async fn first_success_wins() {
        let a = Scripted::ok("a", 1);
        let b = Scripted::ok("b", 2);
        let writer = chain(&[&a, &b]);

        let record = writer.write(payload()).await.unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_fall_through_in_order() {
        let a = Scripted::failing("a");
        let b = Scripted::slow("b", 2, Duration::from_millis(500));
        let c = Scripted::ok("c", 3);
        let writer = chain(&[&a, &b, &c]);

        let record = writer.write(payload()).await.unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn last_error_is_surfaced() {
        let writer = chain(&[&Scripted::failing("a"), &Scripted::failing("b")]);
        let err = writer.write(payload()).await.unwrap_err();
        assert!(err.to_string().contains("b down"));
    }

    #[tokio::test]
    async fn invalid_payload_never_reaches_a_tier() {
        let a = Scripted::ok("a", 1);
        let writer = chain(&[&a]);
        let mut bad = payload();
        bad.member2_name = String::new();

        assert!(matches!(
            writer.write(bad).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(a.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_defaults_to_pending() {
        let writer = chain(&[&Scripted::ok("a", 1)]);
        let record = writer.write(payload()).await.unwrap();
        assert_eq!(record.status, crate::domain::RegistrationStatus::Pending);
    }
}
