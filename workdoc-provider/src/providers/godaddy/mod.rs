//! GoDaddy DNS Provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::http_client::RetryPolicy;
use crate::providers::common::create_http_client;
use crate::types::SubdomainTarget;

pub(crate) use types::{GodaddyDomain, GodaddyErrorBody, GodaddyRecord};

pub(crate) const GODADDY_API_BASE: &str = "https://api.godaddy.com/v1";

/// GoDaddy DNS Provider
///
/// GoDaddy 记录没有独立 ID，以 `"{TYPE}/{name}"` 作为记录标识。
pub struct GodaddyProvider {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) api_secret: String,
    pub(crate) target: SubdomainTarget,
    pub(crate) base_url: String,
    pub(crate) retry: RetryPolicy,
}

impl GodaddyProvider {
    pub fn new(api_key: String, api_secret: String, target: SubdomainTarget) -> Self {
        Self {
            client: create_http_client(),
            api_key,
            api_secret,
            target,
            base_url: GODADDY_API_BASE.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the provider at a different API root (mock servers, OTE).
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

    /// `Authorization` 头的值
    pub(crate) fn auth_header(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }
}
