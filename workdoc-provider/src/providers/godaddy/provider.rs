//! GoDaddy DnsProvider trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{ensure_valid_label, parse_record_type};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    DnsRecord, FieldType, ProviderCredentialField, ProviderMetadata, ProviderType,
    SubdomainTarget,
};

use super::{GodaddyDomain, GodaddyProvider, GodaddyRecord};

impl GodaddyProvider {
    /// 记录集合路径，例如 `/domains/workdoc360.com/records/CNAME`
    fn records_path(&self) -> String {
        format!(
            "/domains/{}/records/{}",
            self.target.domain,
            self.target.record_type.as_str()
        )
    }

    /// 将 GoDaddy 记录转换为 `DnsRecord`
    pub(crate) fn godaddy_record_to_dns_record(&self, record: GodaddyRecord) -> Result<DnsRecord> {
        let record_type = parse_record_type(&record.record_type, self.provider_name())?;

        Ok(DnsRecord {
            id: format!("{}/{}", record_type.as_str(), record.name),
            name: self.target.relative_name(&record.name),
            record_type,
            content: record.data,
            ttl: record.ttl,
            proxied: None,
        })
    }
}

#[async_trait]
impl DnsProvider for GodaddyProvider {
    fn id(&self) -> &'static str {
        "godaddy"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Godaddy,
            name: "GoDaddy".to_string(),
            description: "GoDaddy domain DNS via the v1 REST API".to_string(),
            required_fields: vec![
                ProviderCredentialField {
                    key: "api_key".to_string(),
                    label: "API Key".to_string(),
                    field_type: FieldType::Text,
                    env_var: Some("GODADDY_API_KEY".to_string()),
                },
                ProviderCredentialField {
                    key: "api_secret".to_string(),
                    label: "API Secret".to_string(),
                    field_type: FieldType::Password,
                    env_var: Some("GODADDY_API_SECRET".to_string()),
                },
            ],
        }
    }

    fn target(&self) -> &SubdomainTarget {
        &self.target
    }

    async fn test_connection(&self) -> Result<bool> {
        let path = format!("/domains/{}", self.target.domain);
        match self
            .get::<GodaddyDomain>(&path, ErrorContext::zone(&self.target.domain))
            .await
        {
            Ok(domain) => {
                log::info!(
                    "GoDaddy domain {} reachable (status {})",
                    domain.domain,
                    domain.status.as_deref().unwrap_or("unknown")
                );
                Ok(true)
            }
            Err(
                e @ (ProviderError::InvalidCredentials { .. }
                | ProviderError::PermissionDenied { .. }
                | ProviderError::DomainNotFound { .. }),
            ) => {
                log::warn!("GoDaddy connection test failed: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_subdomains(&self) -> Result<Vec<DnsRecord>> {
        let records: Vec<GodaddyRecord> = self
            .get(&self.records_path(), ErrorContext::zone(&self.target.domain))
            .await?;

        records
            .into_iter()
            .map(|r| self.godaddy_record_to_dns_record(r))
            .collect()
    }

    async fn find_subdomain(&self, name: &str) -> Result<Option<DnsRecord>> {
        ensure_valid_label(name, self.provider_name())?;

        let path = format!("{}/{}", self.records_path(), name);
        let records: Vec<GodaddyRecord> = self
            .get(&path, ErrorContext::zone(&self.target.domain))
            .await?;

        records
            .into_iter()
            .next()
            .map(|r| self.godaddy_record_to_dns_record(r))
            .transpose()
    }

    async fn create_subdomain(&self, name: &str) -> Result<DnsRecord> {
        ensure_valid_label(name, self.provider_name())?;

        let record = GodaddyRecord {
            record_type: self.target.record_type.as_str().to_string(),
            name: name.to_string(),
            data: self.target.content.clone(),
            ttl: self.target.ttl,
        };
        let body = serde_json::to_value([&record]).map_err(|e| self.serialization_error(e))?;

        let path = format!("/domains/{}/records", self.target.domain);
        self.patch(&path, body, ErrorContext::record(name)).await?;

        log::info!("Created {} record {}", record.record_type, self.target.fqdn(name));
        self.godaddy_record_to_dns_record(record)
    }

    async fn delete_subdomain(&self, name: &str) -> Result<()> {
        if self.find_subdomain(name).await?.is_none() {
            return Err(ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: name.to_string(),
                raw_message: None,
            });
        }

        let path = format!("{}/{}", self.records_path(), name);
        self.delete(&path, ErrorContext::record(name)).await?;

        log::info!("Deleted record {}", self.target.fqdn(name));
        Ok(())
    }
}
