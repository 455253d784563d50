use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Deployment environment, gates destructive data operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Remote table store. `None` disables the direct database tier.
    pub database_url: Option<String>,
    /// Upstream proxy for registrant writes. `None` disables the proxy tier.
    pub api_base_url: Option<String>,
    pub local_store_path: PathBuf,
    pub request_timeout: Duration,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub environment: Environment,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub admin_email: String,
    pub audit_retention_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            api_base_url: None,
            local_store_path: PathBuf::from("registrations.local.json"),
            request_timeout: Duration::from_millis(10_000),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            port: 3001,
            cors_allowed_origins: Vec::new(),
            environment: Environment::Development,
            jwt_secret: "dev-secret-change-me".to_string(),
            admin_username: "admin".to_string(),
            admin_password: None,
            admin_email: "admin@localhost".to_string(),
            audit_retention_days: 90,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let jwt_secret = non_empty("JWT_SECRET").unwrap_or_else(|| {
            if cfg!(debug_assertions) {
                defaults.jwt_secret.clone()
            } else {
                tracing::warn!(
                    "JWT_SECRET is not set; using a random key, admin tokens will not survive a restart"
                );
                random_secret()
            }
        });

        let admin_password = non_empty("ADMIN_PASSWORD").or_else(|| {
            if cfg!(debug_assertions) {
                Some("hackathon2026".to_string())
            } else {
                None
            }
        });

        Self {
            database_url: non_empty("DATABASE_URL"),
            api_base_url: non_empty("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            local_store_path: non_empty("LOCAL_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_store_path),
            request_timeout: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            environment,
            jwt_secret,
            admin_username: non_empty("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password,
            admin_email: non_empty("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            audit_retention_days: env::var("AUDIT_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.audit_retention_days),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn random_secret() -> String {
    use rand::{Rng, distributions::Alphanumeric};

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "DATABASE_URL",
        "API_BASE_URL",
        "LOCAL_STORE_PATH",
        "REQUEST_TIMEOUT_MS",
        "OPENAI_API_KEY",
        "APP_ENV",
        "CORS_ALLOWED_ORIGINS",
    ];

    fn clear() {
        for key in KEYS {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn unset_collaborators_disable_tiers() {
        clear();
        let config = Config::from_env();
        assert!(config.database_url.is_none());
        assert!(config.api_base_url.is_none());
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear();
        unsafe {
            env::set_var("API_BASE_URL", "http://proxy.local:3001/");
            env::set_var("REQUEST_TIMEOUT_MS", "250");
            env::set_var("APP_ENV", "production");
            env::set_var("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test");
            env::set_var("DATABASE_URL", "   ");
        }

        let config = Config::from_env();
        assert_eq!(config.api_base_url.as_deref(), Some("http://proxy.local:3001"));
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert!(config.environment.is_production());
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(config.database_url.is_none());
        clear();
    }
}
