//! Application configuration.
//!
//! Loaded from a TOML file with defaults for every field, then overridden
//! from the environment for secrets and deployment values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use workdoc_core::error::{CoreError, CoreResult};
use workdoc_core::services::{PoolSettings, DEFAULT_POOL_PREFIX};
use workdoc_core::types::{DnsRecordType, ProviderCredentials, ProviderType, SubdomainTarget};

use crate::adapters::{ANTHROPIC_API_URL, DEFAULT_MODEL};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "workdoc.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub dns: DnsConfig,
    pub pool: PoolConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; the CLI falls back to the user data directory.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    /// `cloudflare` or `godaddy`; unset disables DNS operations.
    pub provider: Option<String>,
    /// Zone subdomains are created in.
    pub domain: String,
    /// Record content every subdomain points at.
    pub target: String,
    pub record_type: String,
    pub ttl: u32,
    pub proxied: Option<bool>,
    /// Fixed delay between provider calls in bulk operations.
    pub setup_delay_ms: u64,
    pub zone_id: Option<String>,
    pub api_token: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            provider: None,
            domain: "workdoc360.com".to_string(),
            target: "app.workdoc360.com".to_string(),
            record_type: "CNAME".to_string(),
            ttl: 600,
            proxied: None,
            setup_delay_ms: 2000,
            zone_id: None,
            api_token: None,
            api_key: None,
            api_secret: None,
        }
    }
}

// 密钥不进日志
impl std::fmt::Debug for DnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsConfig")
            .field("provider", &self.provider)
            .field("domain", &self.domain)
            .field("target", &self.target)
            .field("record_type", &self.record_type)
            .field("ttl", &self.ttl)
            .field("proxied", &self.proxied)
            .field("setup_delay_ms", &self.setup_delay_ms)
            .field("zone_id", &self.zone_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Candidate name prefixes, used in turn when expanding.
    pub prefixes: Vec<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            prefixes: vec![DEFAULT_POOL_PREFIX.to_string()],
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Unset disables card verification and document generation.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub api_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        toml::from_str(content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid config: {e}")))
    }

    /// Load `path`, or `workdoc.toml` when present, then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::read_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> CoreResult<Self> {
        log::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ValidationError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Override fields from environment variables looked up through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = var("WORKDOC_DATABASE_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Some(provider) = var("WORKDOC_DNS_PROVIDER") {
            self.dns.provider = Some(provider);
        }
        if let Some(domain) = var("WORKDOC_BASE_DOMAIN") {
            self.dns.domain = domain;
        }
        if let Some(target) = var("WORKDOC_DNS_TARGET") {
            self.dns.target = target;
        }
        if let Some(token) = var("CLOUDFLARE_API_TOKEN") {
            self.dns.api_token = Some(token);
        }
        if let Some(zone_id) = var("CLOUDFLARE_ZONE_ID") {
            self.dns.zone_id = Some(zone_id);
        }
        if let Some(key) = var("GODADDY_API_KEY") {
            self.dns.api_key = Some(key);
        }
        if let Some(secret) = var("GODADDY_API_SECRET") {
            self.dns.api_secret = Some(secret);
        }
        if let Some(key) = var("ANTHROPIC_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = var("ANTHROPIC_MODEL") {
            self.llm.model = model;
        }
    }

    /// Credentials of the selected DNS provider, `None` when no provider is
    /// configured.
    pub fn provider_credentials(&self) -> CoreResult<Option<ProviderCredentials>> {
        let Some(provider) = self.dns.provider.as_deref() else {
            return Ok(None);
        };
        let provider = provider
            .parse::<ProviderType>()
            .map_err(CoreError::ValidationError)?;

        let required = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    CoreError::ValidationError(format!("{name} is required for {provider}"))
                })
        };

        let credentials = match provider {
            ProviderType::Cloudflare => ProviderCredentials::Cloudflare {
                api_token: required(&self.dns.api_token, "dns.api_token")?,
                zone_id: required(&self.dns.zone_id, "dns.zone_id")?,
            },
            ProviderType::Godaddy => ProviderCredentials::Godaddy {
                api_key: required(&self.dns.api_key, "dns.api_key")?,
                api_secret: required(&self.dns.api_secret, "dns.api_secret")?,
            },
        };
        Ok(Some(credentials))
    }

    /// Zone and record every subdomain is provisioned as.
    pub fn subdomain_target(&self) -> CoreResult<SubdomainTarget> {
        let record_type = self
            .dns
            .record_type
            .parse::<DnsRecordType>()
            .map_err(CoreError::ValidationError)?;

        Ok(SubdomainTarget {
            domain: self.dns.domain.trim().trim_end_matches('.').to_string(),
            content: self.dns.target.trim().to_string(),
            record_type,
            ttl: self.dns.ttl,
            proxied: self.dns.proxied,
        })
    }

    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            prefixes: self.pool.prefixes.clone(),
            setup_delay: Duration::from_millis(self.dns.setup_delay_ms),
        }
    }
}
