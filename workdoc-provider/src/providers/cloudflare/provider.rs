//! Cloudflare DnsProvider trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{ensure_valid_label, parse_record_type};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    DnsRecord, FieldType, ProviderCredentialField, ProviderMetadata, ProviderType,
    SubdomainTarget,
};

use super::types::CreateRecordBody;
use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareZone};

impl CloudflareProvider {
    /// 将 Cloudflare 记录转换为 `DnsRecord`
    pub(crate) fn cf_record_to_dns_record(&self, cf_record: CloudflareDnsRecord) -> Result<DnsRecord> {
        let record_type = parse_record_type(&cf_record.record_type, self.provider_name())?;

        Ok(DnsRecord {
            id: cf_record.id,
            name: self.target.relative_name(&cf_record.name),
            record_type,
            content: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied,
        })
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Cloudflare,
            name: "Cloudflare".to_string(),
            description: "Cloudflare DNS, token scoped to a single zone".to_string(),
            required_fields: vec![
                ProviderCredentialField {
                    key: "api_token".to_string(),
                    label: "API Token".to_string(),
                    field_type: FieldType::Password,
                    env_var: Some("CLOUDFLARE_API_TOKEN".to_string()),
                },
                ProviderCredentialField {
                    key: "zone_id".to_string(),
                    label: "Zone ID".to_string(),
                    field_type: FieldType::Text,
                    env_var: Some("CLOUDFLARE_ZONE_ID".to_string()),
                },
            ],
        }
    }

    fn target(&self) -> &SubdomainTarget {
        &self.target
    }

    async fn test_connection(&self) -> Result<bool> {
        let path = format!("/zones/{}", self.zone_id);
        match self
            .get::<CloudflareZone>(&path, ErrorContext::zone(&self.zone_id))
            .await
        {
            Ok(zone) => {
                if zone.name.eq_ignore_ascii_case(&self.target.domain) {
                    log::info!("Cloudflare zone {} ({}) reachable", zone.name, zone.id);
                    Ok(true)
                } else {
                    log::warn!(
                        "Cloudflare zone {} is {}, expected {}",
                        zone.id,
                        zone.name,
                        self.target.domain
                    );
                    Ok(false)
                }
            }
            Err(
                e @ (ProviderError::InvalidCredentials { .. }
                | ProviderError::PermissionDenied { .. }
                | ProviderError::DomainNotFound { .. }),
            ) => {
                log::warn!("Cloudflare connection test failed: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_subdomains(&self) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let (batch, total_pages) = self.get_records_page(page, None).await?;
            for cf_record in batch {
                records.push(self.cf_record_to_dns_record(cf_record)?);
            }
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    async fn find_subdomain(&self, name: &str) -> Result<Option<DnsRecord>> {
        ensure_valid_label(name, self.provider_name())?;

        let fqdn = self.target.fqdn(name);
        let (batch, _) = self.get_records_page(1, Some(&fqdn)).await?;

        batch
            .into_iter()
            .find(|r| r.name.eq_ignore_ascii_case(&fqdn))
            .map(|r| self.cf_record_to_dns_record(r))
            .transpose()
    }

    async fn create_subdomain(&self, name: &str) -> Result<DnsRecord> {
        ensure_valid_label(name, self.provider_name())?;

        let body = CreateRecordBody {
            record_type: self.target.record_type.as_str(),
            name: self.target.fqdn(name),
            content: &self.target.content,
            ttl: self.target.ttl,
            proxied: self.target.proxied,
        };
        let body = serde_json::to_value(&body).map_err(|e| self.serialization_error(e))?;

        let path = format!("/zones/{}/dns_records", self.zone_id);
        let cf_record: CloudflareDnsRecord =
            self.post(&path, body, ErrorContext::record(name)).await?;

        log::info!("Created {} record {}", cf_record.record_type, cf_record.name);
        self.cf_record_to_dns_record(cf_record)
    }

    async fn delete_subdomain(&self, name: &str) -> Result<()> {
        let record = self
            .find_subdomain(name)
            .await?
            .ok_or_else(|| ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: name.to_string(),
                raw_message: None,
            })?;

        let path = format!("/zones/{}/dns_records/{}", self.zone_id, record.id);
        self.delete(&path, ErrorContext::record(name)).await?;

        log::info!("Deleted record {} ({})", self.target.fqdn(name), record.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DnsRecordType;
    use serde_json::json;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new(
            "token".to_string(),
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
    fn converts_record_to_relative_name() {
        let record = provider()
            .cf_record_to_dns_record(CloudflareDnsRecord {
                id: "rec-1".to_string(),
                record_type: "CNAME".to_string(),
                name: "company7.workdoc360.com".to_string(),
                content: "app.workdoc360.com".to_string(),
                ttl: 1,
                proxied: Some(true),
            })
            .unwrap();
        assert_eq!(record.name, "company7");
        assert_eq!(record.record_type, DnsRecordType::Cname);
        assert_eq!(record.proxied, Some(true));
    }

    #[test]
    fn create_body_uses_fqdn() {
        let p = provider();
        let body = CreateRecordBody {
            record_type: p.target.record_type.as_str(),
            name: p.target.fqdn("acme"),
            content: &p.target.content,
            ttl: p.target.ttl,
            proxied: p.target.proxied,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "CNAME",
                "name": "acme.workdoc360.com",
                "content": "app.workdoc360.com",
                "ttl": 1,
                "proxied": true
            })
        );
    }

    #[test]
    fn metadata_names_env_vars() {
        let meta = CloudflareProvider::metadata();
        let vars: Vec<_> = meta
            .required_fields
            .iter()
            .filter_map(|f| f.env_var.as_deref())
            .collect();
        assert_eq!(vars, vec!["CLOUDFLARE_API_TOKEN", "CLOUDFLARE_ZONE_ID"]);
    }
}
