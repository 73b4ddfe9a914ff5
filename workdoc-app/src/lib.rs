//! Application bootstrap for WorkDoc360.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter
//! injection), configuration loading and the SQLite / Anthropic adapters.

pub mod adapters;
pub mod config;

use std::sync::Arc;

use workdoc_core::error::{CoreError, CoreResult};
use workdoc_core::services::{
    CardVerificationService, CompanyService, DocumentService, PoolSettings, ServiceContext,
    SubdomainService,
};
use workdoc_core::traits::{
    CandidateRepository, CompanyRepository, DocumentRepository, LanguageModel,
};
use workdoc_provider::DnsProvider;

pub use config::AppConfig;

/// Application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs
/// this once at startup via `AppStateBuilder` or [`AppState::from_config`].
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ServiceContext>,
    /// Company registration
    pub company_service: CompanyService,
    /// Subdomain pool manager
    pub subdomain_service: SubdomainService,
    /// CSCS card verification
    pub card_verification_service: CardVerificationService,
    /// Compliance document generation
    pub document_service: DocumentService,
}

impl AppState {
    /// Open the SQLite store and wire the DNS provider and language model
    /// described by `config`.
    ///
    /// A missing DNS provider or LLM key is not an error; the operations
    /// that need them report it when called.
    #[cfg(feature = "sqlite-store")]
    pub async fn from_config(config: &AppConfig, db_path: &std::path::Path) -> CoreResult<Self> {
        let store = Arc::new(adapters::SqliteStore::new(db_path).await?);

        let mut builder = AppStateBuilder::new()
            .company_repository(store.clone())
            .candidate_repository(store.clone())
            .document_repository(store)
            .pool_settings(config.pool_settings());

        match config.provider_credentials()? {
            Some(credentials) => {
                let provider =
                    workdoc_provider::create_provider(credentials, config.subdomain_target()?)?;
                log::info!(
                    "DNS provider {} configured for {}",
                    provider.id(),
                    provider.target().domain
                );
                builder = builder.dns_provider(provider);
            }
            None => log::warn!("No DNS provider configured, DNS operations are disabled"),
        }

        match config.llm.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(api_key) => {
                let mut client =
                    adapters::AnthropicClient::new(api_key.to_string(), config.llm.model.clone())
                        .with_api_url(config.llm.api_url.clone());
                if let Some(max_tokens) = config.llm.max_tokens {
                    client = client.with_max_tokens(max_tokens);
                }
                builder = builder.language_model(Arc::new(client));
            }
            None => log::warn!("No Anthropic API key configured, LLM operations are disabled"),
        }

        builder.build()
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `company_repository`
/// - `candidate_repository`
/// - `document_repository`
///
/// # Optional
/// - `dns_provider`, `language_model`
/// - `pool_settings` — defaults to `PoolSettings::default()`
pub struct AppStateBuilder {
    company_repository: Option<Arc<dyn CompanyRepository>>,
    candidate_repository: Option<Arc<dyn CandidateRepository>>,
    document_repository: Option<Arc<dyn DocumentRepository>>,
    dns_provider: Option<Arc<dyn DnsProvider>>,
    language_model: Option<Arc<dyn LanguageModel>>,
    pool_settings: PoolSettings,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            company_repository: None,
            candidate_repository: None,
            document_repository: None,
            dns_provider: None,
            language_model: None,
            pool_settings: PoolSettings::default(),
        }
    }

    #[must_use]
    pub fn company_repository(mut self, repo: Arc<dyn CompanyRepository>) -> Self {
        self.company_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn candidate_repository(mut self, repo: Arc<dyn CandidateRepository>) -> Self {
        self.candidate_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn document_repository(mut self, repo: Arc<dyn DocumentRepository>) -> Self {
        self.document_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn dns_provider(mut self, provider: Arc<dyn DnsProvider>) -> Self {
        self.dns_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.language_model = Some(model);
        self
    }

    #[must_use]
    pub fn pool_settings(mut self, settings: PoolSettings) -> Self {
        self.pool_settings = settings;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let company_repository = self.company_repository.ok_or_else(|| {
            CoreError::ValidationError("company_repository is required".to_string())
        })?;
        let candidate_repository = self.candidate_repository.ok_or_else(|| {
            CoreError::ValidationError("candidate_repository is required".to_string())
        })?;
        let document_repository = self.document_repository.ok_or_else(|| {
            CoreError::ValidationError("document_repository is required".to_string())
        })?;

        let mut ctx = ServiceContext::new(
            company_repository,
            candidate_repository,
            document_repository,
        )
        .with_pool_settings(self.pool_settings);
        if let Some(provider) = self.dns_provider {
            ctx = ctx.with_dns_provider(provider);
        }
        if let Some(model) = self.language_model {
            ctx = ctx.with_language_model(model);
        }
        let ctx = Arc::new(ctx);

        Ok(AppState {
            company_service: CompanyService::new(Arc::clone(&ctx)),
            subdomain_service: SubdomainService::new(Arc::clone(&ctx)),
            card_verification_service: CardVerificationService::new(Arc::clone(&ctx)),
            document_service: DocumentService::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
