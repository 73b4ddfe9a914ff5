use serde::{Deserialize, Serialize};

use crate::utils::log_sanitizer::mask_secret;

// ============ Provider Types ============

/// Identifies which DNS provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Cloudflare DNS. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    Cloudflare,
    /// GoDaddy DNS. Requires feature `godaddy`.
    #[cfg(feature = "godaddy")]
    Godaddy,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare => write!(f, "cloudflare"),
            #[cfg(feature = "godaddy")]
            Self::Godaddy => write!(f, "godaddy"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            #[cfg(feature = "cloudflare")]
            "cloudflare" => Ok(Self::Cloudflare),
            #[cfg(feature = "godaddy")]
            "godaddy" => Ok(Self::Godaddy),
            other => Err(format!("unsupported DNS provider: {other}")),
        }
    }
}

// ============ Record Types ============

/// Record types a subdomain can be provisioned as.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DnsRecordType {
    /// IPv4 address record.
    #[serde(rename = "A")]
    A,
    /// IPv6 address record.
    #[serde(rename = "AAAA")]
    Aaaa,
    /// Alias to another hostname.
    #[serde(rename = "CNAME")]
    Cname,
}

impl DnsRecordType {
    /// Wire name used by both provider APIs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
        }
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DnsRecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            other => Err(format!("unsupported record type: {other}")),
        }
    }
}

/// Where every provisioned subdomain points.
///
/// A provider instance is bound to one target: all subdomains it creates
/// share the zone, record type, content and TTL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubdomainTarget {
    /// Zone apex, e.g. `"workdoc360.com"`.
    pub domain: String,
    /// Record content: a hostname for CNAME, an address for A/AAAA.
    pub content: String,
    /// Record type for every subdomain.
    pub record_type: DnsRecordType,
    /// TTL in seconds.
    pub ttl: u32,
    /// Cloudflare proxy flag. Ignored by providers without a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

impl SubdomainTarget {
    /// Fully qualified name for a subdomain label.
    #[must_use]
    pub fn fqdn(&self, label: &str) -> String {
        if label.is_empty() || label == "@" {
            self.domain.clone()
        } else {
            format!("{label}.{}", self.domain)
        }
    }

    /// Label relative to the zone for a name returned by a provider.
    ///
    /// Names already relative are returned unchanged; the apex maps to `"@"`.
    #[must_use]
    pub fn relative_name(&self, full_name: &str) -> String {
        let full_name = full_name.trim_end_matches('.');
        if full_name.eq_ignore_ascii_case(&self.domain) {
            return "@".to_string();
        }
        let suffix = format!(".{}", self.domain);
        if full_name.len() > suffix.len()
            && full_name[full_name.len() - suffix.len()..].eq_ignore_ascii_case(&suffix)
        {
            full_name[..full_name.len() - suffix.len()].to_string()
        } else {
            full_name.to_string()
        }
    }
}

/// A DNS record as seen by the provisioning workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Provider-specific identifier used for deletion.
    pub id: String,
    /// Label relative to the zone (e.g. `"company7"`).
    pub name: String,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Target content.
    pub content: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Cloudflare proxy status, `None` for other providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

// ============ Metadata ============

/// Input type for a credential field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Secret input.
    Password,
}

/// Describes a credential field for configuration tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Configuration key (e.g. `"api_token"`).
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Input type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Environment variable that supplies the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_var: Option<String>,
}

/// Static description of a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Credential fields required to authenticate.
    pub required_fields: Vec<ProviderCredentialField>,
}

// ============ Credential Types ============

/// Validation error for provider credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
    },
    /// A credential field is present but empty or whitespace.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { provider, field } => {
                write!(f, "Missing required {provider} credential: {field}")
            }
            Self::EmptyField { provider, field } => {
                write!(f, "{provider} credential must not be empty: {field}")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe credential container for the supported DNS providers.
///
/// Pass this to [`create_provider()`](crate::create_provider).
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Cloudflare credentials. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    #[serde(rename = "cloudflare")]
    Cloudflare {
        /// Cloudflare API token with `Zone.DNS` edit permission.
        api_token: String,
        /// Identifier of the zone subdomains are created in.
        zone_id: String,
    },

    /// GoDaddy credentials. Requires feature `godaddy`.
    #[cfg(feature = "godaddy")]
    #[serde(rename = "godaddy")]
    Godaddy {
        /// GoDaddy API key.
        api_key: String,
        /// GoDaddy API secret.
        api_secret: String,
    },
}

// Secrets never reach log output.
impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { api_token, zone_id } => f
                .debug_struct("Cloudflare")
                .field("api_token", &mask_secret(api_token))
                .field("zone_id", zone_id)
                .finish(),
            #[cfg(feature = "godaddy")]
            Self::Godaddy {
                api_key,
                api_secret,
            } => f
                .debug_struct("Godaddy")
                .field("api_key", &mask_secret(api_key))
                .field("api_secret", &mask_secret(api_secret))
                .finish(),
        }
    }
}

impl ProviderCredentials {
    /// Provider these credentials belong to.
    #[must_use]
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { .. } => ProviderType::Cloudflare,
            #[cfg(feature = "godaddy")]
            Self::Godaddy { .. } => ProviderType::Godaddy,
        }
    }

    /// Check that no required field is blank.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        let provider = self.provider_type();
        let fields: Vec<(&str, &str)> = match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { api_token, zone_id } => {
                vec![("api_token", api_token.as_str()), ("zone_id", zone_id.as_str())]
            }
            #[cfg(feature = "godaddy")]
            Self::Godaddy {
                api_key,
                api_secret,
            } => vec![("api_key", api_key.as_str()), ("api_secret", api_secret.as_str())],
        };

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(CredentialValidationError::EmptyField {
                    provider,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}
