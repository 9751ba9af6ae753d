//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `HARVEST_DB_PATH` - Database file (default: `orders.redb`)
//! - `HARVEST_BASE_URL` - Order source root (default: `https://www.ozon.ru`)
//! - `HARVEST_COOKIE` - `Cookie` header of a signed-in session
//! - `HARVEST_USER_AGENT` - `User-Agent` header (default: `order-harvest/<version>`)
//! - `HARVEST_BATCH_SIZE` - Concurrent fetches per batch (default: 5)
//! - `HARVEST_TIMEOUT_SECS` - Per-request timeout (default: 15)

use crate::discovery::DEFAULT_BATCH_SIZE;
use crate::source::SourceConfig;
use crate::store::StoreLocation;
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_DB_PATH: &str = "orders.redb";
const DEFAULT_BASE_URL: &str = "https://www.ozon.ru";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Clone)]
pub struct HarvestConfig {
    pub db_path: PathBuf,
    pub base_url: Url,
    /// Session cookie; `None` means scans fail with missing credentials.
    pub cookie: Option<SecretString>,
    pub user_agent: String,
    pub batch_size: u64,
    pub timeout: Duration,
}

impl std::fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("db_path", &self.db_path)
            .field("base_url", &self.base_url.as_str())
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .field("batch_size", &self.batch_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HarvestConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = PathBuf::from(get("HARVEST_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into()));

        let base_url = get("HARVEST_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let base_url = Url::parse(&base_url).map_err(|e| invalid("HARVEST_BASE_URL", e))?;
        if base_url.host_str().is_none() {
            return Err(invalid("HARVEST_BASE_URL", "URL has no host"));
        }

        let cookie = get("HARVEST_COOKIE")
            .filter(|c| !c.trim().is_empty())
            .map(SecretString::from);

        let user_agent = get("HARVEST_USER_AGENT")
            .unwrap_or_else(|| format!("order-harvest/{}", env!("CARGO_PKG_VERSION")));

        let batch_size = match get("HARVEST_BATCH_SIZE") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => return Err(invalid("HARVEST_BATCH_SIZE", "must be at least 1")),
                Ok(n) => n,
                Err(e) => return Err(invalid("HARVEST_BATCH_SIZE", e)),
            },
            None => DEFAULT_BATCH_SIZE,
        };

        let timeout_secs = match get("HARVEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid("HARVEST_TIMEOUT_SECS", e))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            db_path,
            base_url,
            cookie,
            user_agent,
            batch_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn store_location(&self) -> StoreLocation {
        StoreLocation::File(self.db_path.clone())
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
    }
}

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}
