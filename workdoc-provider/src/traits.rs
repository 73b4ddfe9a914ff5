use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{DnsRecord, ProviderMetadata, SubdomainTarget};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` / `RecordNotFound`）
    pub record_name: Option<String>,
    /// 区域 ID 或域名（用于 `DomainNotFound`）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn record(name: &str) -> Self {
        Self {
            record_name: Some(name.to_string()),
            domain: None,
        }
    }

    pub fn zone(domain: &str) -> Self {
        Self {
            record_name: None,
            domain: Some(domain.to_string()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：序列化错误
    fn serialization_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Zone-scoped DNS provider used by the subdomain pool manager.
///
/// Names passed in and returned are labels relative to the zone of the
/// provider's [`SubdomainTarget`].
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier (`"cloudflare"`, `"godaddy"`).
    fn id(&self) -> &'static str;

    /// Static metadata, available without an instance.
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Zone and record target this instance provisions into.
    fn target(&self) -> &SubdomainTarget;

    /// Confirm that the credentials are accepted and the configured zone is
    /// reachable with them.
    ///
    /// Returns `Ok(false)` for rejected credentials or an unknown zone;
    /// transport failures are returned as errors.
    async fn test_connection(&self) -> Result<bool>;

    /// All records of the target's type in the zone.
    async fn list_subdomains(&self) -> Result<Vec<DnsRecord>>;

    /// Record of the target's type for `name`, if any.
    async fn find_subdomain(&self, name: &str) -> Result<Option<DnsRecord>>;

    /// Create a record for `name` pointing at the target content.
    async fn create_subdomain(&self, name: &str) -> Result<DnsRecord>;

    /// Delete the record for `name`.
    ///
    /// Looks the record up by name first and deletes it by its identifier;
    /// fails with [`ProviderError::RecordNotFound`] when nothing matches.
    async fn delete_subdomain(&self, name: &str) -> Result<()>;

    /// Whether a record exists for `name`.
    async fn subdomain_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_subdomain(name).await?.is_some())
    }
}
