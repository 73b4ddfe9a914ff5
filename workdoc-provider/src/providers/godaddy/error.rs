//! GoDaddy error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::GodaddyProvider;

/// GoDaddy error code mapping
///
/// Error bodies look like `{"code": "DUPLICATE_RECORD", "message": "..."}`;
/// bodies without a code are mapped by HTTP status.
impl ProviderErrorMapper for GodaddyProvider {
    fn provider_name(&self) -> &'static str {
        "godaddy"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("UNABLE_TO_AUTHENTICATE" | "401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("ACCESS_DENIED" | "NOT_AUTHORIZED" | "403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("UNKNOWN_DOMAIN") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 记录级请求的 404 指记录不存在，其余指域名不存在
            Some("NOT_FOUND" | "404") => match context.record_name {
                Some(record_id) => ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_id,
                    raw_message: Some(raw.message),
                },
                None => ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
            },

            Some("DUPLICATE_RECORD" | "409") => ProviderError::RecordExists {
                provider: self.provider_name().to_string(),
                record_name: context
                    .record_name
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            Some("INVALID_BODY" | "INVALID_ARGUMENT" | "INVALID_VALUE_ENUM" | "422") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: "general".to_string(),
                    detail: raw.message,
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DnsRecordType, SubdomainTarget};

    fn provider() -> GodaddyProvider {
        GodaddyProvider::new(
            String::new(),
            String::new(),
            SubdomainTarget {
                domain: "workdoc360.com".to_string(),
                content: "app.workdoc360.com".to_string(),
                record_type: DnsRecordType::Cname,
                ttl: 600,
                proxied: None,
            },
        )
    }

    #[test]
    fn authentication_failure() {
        let err = provider().map_error(
            RawApiError::with_code("UNABLE_TO_AUTHENTICATE", "Unauthorized : Could not authenticate API key/secret"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn access_denied() {
        for code in ["ACCESS_DENIED", "NOT_AUTHORIZED", "403"] {
            let err = provider().map_error(RawApiError::with_code(code, "denied"), ErrorContext::default());
            assert!(matches!(err, ProviderError::PermissionDenied { .. }), "code {code}");
        }
    }

    #[test]
    fn unknown_domain() {
        let err = provider().map_error(
            RawApiError::with_code("UNKNOWN_DOMAIN", "The given domain is not registered"),
            ErrorContext::zone("workdoc360.com"),
        );
        assert!(matches!(
            err,
            ProviderError::DomainNotFound { domain, .. } if domain == "workdoc360.com"
        ));
    }

    #[test]
    fn not_found_depends_on_context() {
        let p = provider();
        let record = p.map_error(
            RawApiError::with_code("NOT_FOUND", "missing"),
            ErrorContext::record("company7"),
        );
        let zone = p.map_error(
            RawApiError::with_code("NOT_FOUND", "missing"),
            ErrorContext::zone("workdoc360.com"),
        );
        assert!(matches!(record, ProviderError::RecordNotFound { record_id, .. } if record_id == "company7"));
        assert!(matches!(zone, ProviderError::DomainNotFound { .. }));
    }

    #[test]
    fn duplicate_record() {
        let err = provider().map_error(
            RawApiError::with_code("DUPLICATE_RECORD", "Another record with the same attributes already exists"),
            ErrorContext::record("acme"),
        );
        assert!(matches!(
            err,
            ProviderError::RecordExists { record_name, .. } if record_name == "acme"
        ));
    }

    #[test]
    fn invalid_body() {
        for code in ["INVALID_BODY", "INVALID_ARGUMENT", "INVALID_VALUE_ENUM"] {
            let err = provider().map_error(RawApiError::with_code(code, "bad"), ErrorContext::default());
            assert!(matches!(err, ProviderError::InvalidParameter { .. }), "code {code}");
        }
    }

    #[test]
    fn unknown_code_falls_back() {
        let err = provider().map_error(
            RawApiError::with_code("500", "Internal Server Error"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::Unknown { raw_code, .. } if raw_code.as_deref() == Some("500")
        ));
    }
}
