//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::types::DnsRecordType;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
///
/// 构建失败时（TLS 后端初始化失败等）退回到默认 Client。
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build HTTP client with timeouts, using defaults: {e}");
            Client::new()
        })
}

// ============ 记录类型转换 ============

/// 将 API 返回的类型字符串转换为 `DnsRecordType`
pub fn parse_record_type(record_type: &str, provider: &str) -> Result<DnsRecordType> {
    record_type
        .parse()
        .map_err(|detail: String| ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "record_type".to_string(),
            detail,
        })
}

// ============ 子域名标签校验 ============

/// Maximum length of a single DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Reject labels the provider APIs would refuse anyway, before any request.
///
/// Accepts lowercase ASCII letters, digits and inner hyphens.
pub fn ensure_valid_label(name: &str, provider: &str) -> Result<()> {
    let invalid = |detail: &str| ProviderError::InvalidParameter {
        provider: provider.to_string(),
        param: "name".to_string(),
        detail: format!("'{name}': {detail}"),
    };

    if name.is_empty() || name.len() > MAX_LABEL_LEN {
        return Err(invalid("label must be 1-63 characters"));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("label must not start or end with a hyphen"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(invalid("label may only contain a-z, 0-9 and '-'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_record_type_accepts_known_types() {
        assert!(matches!(
            parse_record_type("cname", "test"),
            Ok(DnsRecordType::Cname)
        ));
    }

    #[test]
    fn parse_record_type_rejects_unknown() {
        assert!(matches!(
            parse_record_type("TXT", "test"),
            Err(ProviderError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn valid_labels() {
        for label in ["company7", "smith-scaffolding-ltd", "a", "9"] {
            assert!(ensure_valid_label(label, "test").is_ok(), "{label}");
        }
    }

    #[test]
    fn invalid_labels() {
        let too_long = "a".repeat(64);
        for label in ["", "-acme", "acme-", "Acme", "acme.ltd", "acme_ltd", too_long.as_str()] {
            assert!(ensure_valid_label(label, "test").is_err(), "{label}");
        }
    }
}
