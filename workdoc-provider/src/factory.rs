//! Provider factory functions and metadata.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::{ProviderCredentials, ProviderMetadata, SubdomainTarget};

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;
#[cfg(feature = "godaddy")]
use crate::providers::GodaddyProvider;

/// Creates a [`DnsProvider`] bound to `target` from the given credentials.
///
/// The concrete provider is selected by the [`ProviderCredentials`] variant.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidParameter`](crate::ProviderError::InvalidParameter)
/// when a credential field is blank.
///
/// # Examples
///
/// ```rust,no_run
/// use workdoc_provider::{create_provider, DnsRecordType, ProviderCredentials, SubdomainTarget};
///
/// let provider = create_provider(
///     ProviderCredentials::Godaddy {
///         api_key: "key".to_string(),
///         api_secret: "secret".to_string(),
///     },
///     SubdomainTarget {
///         domain: "workdoc360.com".to_string(),
///         content: "app.workdoc360.com".to_string(),
///         record_type: DnsRecordType::Cname,
///         ttl: 600,
///         proxied: None,
///     },
/// )
/// .unwrap();
/// ```
pub fn create_provider(
    credentials: ProviderCredentials,
    target: SubdomainTarget,
) -> Result<Arc<dyn DnsProvider>> {
    if let Err(e) = credentials.validate() {
        return Err(crate::ProviderError::InvalidParameter {
            provider: credentials.provider_type().to_string(),
            param: "credentials".to_string(),
            detail: e.to_string(),
        });
    }

    log::debug!(
        "Creating {} provider for zone {}",
        credentials.provider_type(),
        target.domain
    );

    match credentials {
        #[cfg(feature = "cloudflare")]
        ProviderCredentials::Cloudflare { api_token, zone_id } => {
            Ok(Arc::new(CloudflareProvider::new(api_token, zone_id, target)))
        }
        #[cfg(feature = "godaddy")]
        ProviderCredentials::Godaddy {
            api_key,
            api_secret,
        } => Ok(Arc::new(GodaddyProvider::new(api_key, api_secret, target))),
    }
}

/// Metadata for all providers enabled via feature flags.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "cloudflare")]
        CloudflareProvider::metadata(),
        #[cfg(feature = "godaddy")]
        GodaddyProvider::metadata(),
    ]
}
