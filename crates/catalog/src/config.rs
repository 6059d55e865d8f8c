//! Configuration for the catalog pipelines
//!
//! The API credential is injected through [`CatalogConfig`] and validated at
//! startup; there is no built-in fallback key.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::common::{CatalogError, GameDomain, Result};

/// Nexus API endpoint
pub const NEXUS_API_BASE: &str = "https://api.nexusmods.com";

/// Environment variable holding the personal Nexus API key
pub const API_KEY_ENV: &str = "NEXUS_API_KEY";

/// Environment variable overriding [`NEXUS_API_BASE`]
pub const API_BASE_ENV: &str = "NEXUS_API_BASE";

/// Default modlist document read by the flattener
pub const DEFAULT_MODLIST_PATH: &str = "modlist";

/// Default CSV written by the flattener and read by the enrichment loop
pub const DEFAULT_EXTRACTED_CSV: &str = "extracted_data_with_id.csv";

/// Default enriched report
pub const DEFAULT_SUMMARIES_CSV: &str = "mod_summaries.csv";

/// Values that people leave in place of a real key
const PLACEHOLDER_KEYS: &[&str] = &["YOUR_API_KEY", "your_api_key_here", "changeme"];

/// Configuration for catalog operations
#[derive(Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub api_base: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Fixed pause after every successful mod fetch
    pub request_delay: Duration,
    pub extracted_csv: PathBuf,
    pub summaries_csv: PathBuf,
    /// Directory holding `<domain>_categories_reference.csv` files
    pub cache_dir: PathBuf,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("request_delay", &self.request_delay)
            .field("extracted_csv", &self.extracted_csv)
            .field("summaries_csv", &self.summaries_csv)
            .field("cache_dir", &self.cache_dir)
            .finish()
    }
}

impl CatalogConfig {
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            debug!("Loaded environment variables from .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(key) = lookup(API_KEY_ENV) {
            builder = builder.api_key(key);
        }
        if let Some(base) = lookup(API_BASE_ENV).filter(|b| !b.trim().is_empty()) {
            builder = builder.api_base(base);
        }
        builder.build()
    }

    /// Path of the category cache for a game
    pub fn category_cache_path(&self, domain: &GameDomain) -> PathBuf {
        category_cache_path(&self.cache_dir, domain)
    }
}

/// `<dir>/<domain>_categories_reference.csv`
pub fn category_cache_path(dir: &Path, domain: &GameDomain) -> PathBuf {
    dir.join(format!("{}_categories_reference.csv", domain))
}

/// Builder for [`CatalogConfig`]; `build` performs validation
#[derive(Debug, Clone)]
pub struct CatalogConfigBuilder {
    api_key: Option<String>,
    api_base: String,
    user_agent: String,
    timeout: Duration,
    request_delay: Duration,
    extracted_csv: PathBuf,
    summaries_csv: PathBuf,
    cache_dir: PathBuf,
}

impl Default for CatalogConfigBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: NEXUS_API_BASE.to_string(),
            user_agent: format!("catalog/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            request_delay: Duration::from_secs(1),
            extracted_csv: PathBuf::from(DEFAULT_EXTRACTED_CSV),
            summaries_csv: PathBuf::from(DEFAULT_SUMMARIES_CSV),
            cache_dir: PathBuf::from("."),
        }
    }
}

impl CatalogConfigBuilder {
    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn api_base<S: Into<String>>(mut self, base: S) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn extracted_csv<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.extracted_csv = path.into();
        self
    }

    pub fn summaries_csv<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.summaries_csv = path.into();
        self
    }

    pub fn cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<CatalogConfig> {
        let api_key = self.api_key.map(|k| k.trim().to_string()).unwrap_or_default();
        if api_key.is_empty() {
            return Err(CatalogError::Configuration {
                message: format!("{} environment variable not set", API_KEY_ENV),
                field: Some(API_KEY_ENV.to_string()),
                suggestion: Some(format!(
                    "Set {} in your environment or .env file with your personal API key from Nexus Mods",
                    API_KEY_ENV
                )),
            });
        }
        if PLACEHOLDER_KEYS.iter().any(|p| p.eq_ignore_ascii_case(&api_key)) {
            return Err(CatalogError::Configuration {
                message: format!("{} still holds the placeholder value '{}'", API_KEY_ENV, api_key),
                field: Some(API_KEY_ENV.to_string()),
                suggestion: Some("Replace it with the key from https://www.nexusmods.com/users/myaccount?tab=api".to_string()),
            });
        }

        let parsed = url::Url::parse(&self.api_base).map_err(|e| match CatalogError::from(e) {
            CatalogError::InvalidUrl { suggestion, source, .. } => CatalogError::InvalidUrl {
                url: self.api_base.clone(),
                suggestion,
                source,
            },
            other => other,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::Configuration {
                message: format!("API base '{}' must use http or https", self.api_base),
                field: Some(API_BASE_ENV.to_string()),
                suggestion: None,
            });
        }

        Ok(CatalogConfig {
            api_key,
            api_base: self.api_base.trim_end_matches('/').to_string(),
            user_agent: self.user_agent,
            timeout: self.timeout,
            request_delay: self.request_delay,
            extracted_csv: self.extracted_csv,
            summaries_csv: self.summaries_csv,
            cache_dir: self.cache_dir,
        })
    }
}
