//! Startup configuration
//!
//! The Gemini credential is resolved once, best effort: the deployment
//! secret store first, then the `GEMINI_API_KEY` environment variable.
//! An absent key is not an error here; the first advisory call reports it.

use crate::error::AdvisorError;
use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const API_KEY_NAME: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SECRETS_PATH: &str = ".secrets/secrets.toml";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Opaque credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.trim().to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Deployment secret store lookup
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` when the store works but has no such key.
    fn lookup(&self, key: &str) -> Result<Option<String>>;
}

/// Secrets kept in a flat TOML file (`GEMINI_API_KEY = "..."`).
pub struct TomlSecretStore {
    path: PathBuf,
}

impl TomlSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(flatten)]
    values: HashMap<String, toml::Value>,
}

impl SecretStore for TomlSecretStore {
    fn lookup(&self, key: &str) -> Result<Option<String>> {
        let raw = std::fs::read_to_string(&self.path)?;
        let parsed: SecretsFile = toml::from_str(&raw).map_err(|e| {
            AdvisorError::Config(format!(
                "Invalid secrets file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(parsed
            .values
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }
}

/// Store with nothing in it, for deployments without a secrets file.
pub struct NoSecretStore;

impl SecretStore for NoSecretStore {
    fn lookup(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Resolve the credential: secret store, then environment. Never fails.
pub fn resolve_credential<F>(store: &dyn SecretStore, env_lookup: F) -> Option<ApiKey>
where
    F: Fn(&str) -> Option<String>,
{
    match store.lookup(API_KEY_NAME) {
        Ok(Some(value)) => {
            if let Some(key) = ApiKey::new(value) {
                info!("{} loaded from secret store", API_KEY_NAME);
                return Some(key);
            }
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Secret store lookup failed, falling back to environment: {}", e);
        }
    }

    match env_lookup(API_KEY_NAME).and_then(ApiKey::new) {
        Some(key) => {
            info!("{} loaded from environment", API_KEY_NAME);
            Some(key)
        }
        None => {
            warn!("{} not set; advisory calls will fail until it is configured", API_KEY_NAME);
            None
        }
    }
}

/// Everything resolved at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub redact_errors: bool,
}

impl AppConfig {
    /// Build from the process environment and the secrets file.
    pub fn from_env() -> Result<Self> {
        let secrets_path = std::env::var("DESK_SECRETS_PATH")
            .unwrap_or_else(|_| DEFAULT_SECRETS_PATH.to_string());
        let store = TomlSecretStore::new(secrets_path);

        Self::load(&store, |k| std::env::var(k).ok())
    }

    pub fn load<F>(store: &dyn SecretStore, env_lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = resolve_credential(store, &env_lookup);

        let model = env_lookup("GEMINI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let port = match env_lookup("PORT").or_else(|| env_lookup("API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AdvisorError::Config(format!("Invalid port '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match env_lookup("ADVISOR_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AdvisorError::Config(format!("Invalid ADVISOR_TIMEOUT_SECS '{}': {}", raw, e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let redact_errors = env_lookup("ADVISOR_REDACT_ERRORS")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            api_key,
            model,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            redact_errors,
        })
    }
}
