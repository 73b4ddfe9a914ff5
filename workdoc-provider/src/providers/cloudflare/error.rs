//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Cloudflare error code mapping
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // Authentication error
            // 6003: Invalid request headers
            // 6111: Invalid format for Authorization header
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            Some("6003" | "6111" | "9109" | "10000") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Invalid parameter
            // 1004: DNS Validation Error
            // 9000: Invalid or missing name
            // 9021: Invalid TTL
            Some(code @ ("1004" | "9000" | "9021")) => {
                let param = match code {
                    "9000" => "name",
                    "9021" => "ttl",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // 81053-81058: a record with that host already exists
            Some("81053" | "81054" | "81055" | "81056" | "81057" | "81058") => {
                ProviderError::RecordExists {
                    provider: self.provider_name().to_string(),
                    record_name: context
                        .record_name
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // 81044: Record does not exist
            Some("81044") => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: context
                    .record_name
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 81045: The record quota has been exceeded
            Some("81045") => ProviderError::QuotaExceeded {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Zone does not exist
            // 7000: No route for that URI
            // 7003: Could not route to /path, perhaps your object identifier is invalid?
            Some("7000" | "7003") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // Body without a Cloudflare code, fall back to HTTP status
            Some("401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DnsRecordType, SubdomainTarget};

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new(
            String::new(),
            "zone-1".to_string(),
            SubdomainTarget {
                domain: "workdoc360.com".to_string(),
                content: "app.workdoc360.com".to_string(),
                record_type: DnsRecordType::Cname,
                ttl: 1,
                proxied: Some(true),
            },
        )
    }

    #[test]
    fn auth_codes_map_to_invalid_credentials() {
        let p = provider();
        for code in ["6003", "6111", "9109", "10000", "401"] {
            let err = p.map_error(RawApiError::with_code(code, "denied"), ErrorContext::default());
            assert!(
                matches!(err, ProviderError::InvalidCredentials { .. }),
                "code {code}: {err:?}"
            );
        }
    }

    #[test]
    fn http_403_maps_to_permission_denied() {
        let err = provider().map_error(
            RawApiError::with_code("403", "forbidden"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
    }

    #[test]
    fn duplicate_codes_carry_record_name() {
        let p = provider();
        for code in ["81053", "81057", "81058"] {
            let err = p.map_error(
                RawApiError::with_code(code, "exists"),
                ErrorContext::record("company7"),
            );
            assert!(
                matches!(&err, ProviderError::RecordExists { record_name, .. } if record_name == "company7"),
                "code {code}: {err:?}"
            );
        }
    }

    #[test]
    fn record_not_found() {
        let err = provider().map_error(
            RawApiError::with_code("81044", "Record does not exist."),
            ErrorContext::record("acme"),
        );
        assert!(matches!(
            err,
            ProviderError::RecordNotFound { record_id, .. } if record_id == "acme"
        ));
    }

    #[test]
    fn quota_exceeded() {
        let err = provider().map_error(
            RawApiError::with_code("81045", "quota"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::QuotaExceeded { .. }));
    }

    #[test]
    fn zone_codes_map_to_domain_not_found() {
        let err = provider().map_error(
            RawApiError::with_code("7003", "Could not route"),
            ErrorContext::zone("zone-1"),
        );
        assert!(matches!(
            err,
            ProviderError::DomainNotFound { domain, .. } if domain == "zone-1"
        ));
    }

    #[test]
    fn validation_codes_name_the_parameter() {
        let err = provider().map_error(
            RawApiError::with_code("9021", "Invalid TTL"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { param, .. } if param == "ttl"
        ));
    }

    #[test]
    fn unknown_code_falls_back() {
        let err = provider().map_error(
            RawApiError::with_code("99999", "something unexpected"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::Unknown { raw_code, raw_message, .. }
                if raw_code.as_deref() == Some("99999") && raw_message == "something unexpected"
        ));
    }

    #[test]
    fn missing_code_falls_back() {
        let err = provider().map_error(
            RawApiError {
                code: None,
                message: "no code at all".to_string(),
            },
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::Unknown { raw_code: None, .. }));
    }
}
