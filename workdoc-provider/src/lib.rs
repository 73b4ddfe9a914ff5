//! # workdoc-provider
//!
//! Zone-scoped DNS provider adapters used to provision customer subdomains.
//!
//! Every provider instance is bound to one zone and one record target (a
//! [`SubdomainTarget`]), so callers only deal in subdomain labels such as
//! `"company7"` or `"smith-scaffolding-ltd"`.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token |
//! | [GoDaddy](https://developer.godaddy.com/) | `godaddy` | `sso-key` API key + secret |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use workdoc_provider::{
//!     create_provider, DnsProvider, DnsRecordType, ProviderCredentials, SubdomainTarget,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = ProviderCredentials::Cloudflare {
//!         api_token: "your-token".to_string(),
//!         zone_id: "your-zone-id".to_string(),
//!     };
//!     let target = SubdomainTarget {
//!         domain: "workdoc360.com".to_string(),
//!         content: "app.workdoc360.com".to_string(),
//!         record_type: DnsRecordType::Cname,
//!         ttl: 600,
//!         proxied: Some(true),
//!     };
//!     let provider = create_provider(credentials, target)?;
//!
//!     if provider.test_connection().await? {
//!         let record = provider.create_subdomain("company7").await?;
//!         println!("created {} -> {}", record.name, record.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError).
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried
//! with exponential backoff by the shared HTTP layer before they reach the
//! caller.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use factory::{create_provider, get_all_provider_metadata};

pub use http_client::RetryPolicy;

pub use traits::DnsProvider;

pub use types::{
    CredentialValidationError, DnsRecord, DnsRecordType, FieldType, ProviderCredentialField,
    ProviderCredentials, ProviderMetadata, ProviderType, SubdomainTarget,
};

#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;

#[cfg(feature = "godaddy")]
pub use providers::GodaddyProvider;
