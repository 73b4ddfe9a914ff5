//! Cloudflare DNS Provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::http_client::RetryPolicy;
use crate::providers::common::create_http_client;
use crate::types::SubdomainTarget;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare DNS Records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// Cloudflare DNS Provider
///
/// 绑定到单个 zone，所有子域名记录都在 `zone_id` 下创建。
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) zone_id: String,
    pub(crate) target: SubdomainTarget,
    pub(crate) base_url: String,
    pub(crate) retry: RetryPolicy,
}

impl CloudflareProvider {
    pub fn new(api_token: String, zone_id: String, target: SubdomainTarget) -> Self {
        Self {
            client: create_http_client(),
            api_token,
            zone_id,
            target,
            base_url: CF_API_BASE.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the provider at a different API root (mock servers, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the retry policy for transient failures.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
