//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::time::Duration;

use httpmock::MockServer;
use workdoc_provider::{
    CloudflareProvider, DnsRecordType, GodaddyProvider, RetryPolicy, SubdomainTarget,
};

pub const ZONE_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";
pub const DOMAIN: &str = "workdoc360.com";
pub const APP_HOST: &str = "app.workdoc360.com";

/// 所有测试共用的子域名目标
pub fn cname_target(proxied: Option<bool>) -> SubdomainTarget {
    SubdomainTarget {
        domain: DOMAIN.to_string(),
        content: APP_HOST.to_string(),
        record_type: DnsRecordType::Cname,
        ttl: 600,
        proxied,
    }
}

/// 快速重试策略，避免测试等待
pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        max_retry_after: Duration::from_millis(5),
    }
}

/// 指向 mock server 的 Cloudflare provider（不重试）
pub fn cloudflare(server: &MockServer) -> CloudflareProvider {
    CloudflareProvider::new("cf-test-token".to_string(), ZONE_ID.to_string(), cname_target(Some(true)))
        .with_base_url(server.base_url())
        .with_retry_policy(RetryPolicy::none())
}

/// 指向 mock server 的 GoDaddy provider（不重试）
pub fn godaddy(server: &MockServer) -> GodaddyProvider {
    GodaddyProvider::new("gd-key".to_string(), "gd-secret".to_string(), cname_target(None))
        .with_base_url(server.base_url())
        .with_retry_policy(RetryPolicy::none())
}

/// Cloudflare 失败响应体
pub fn cf_error(code: i64, message: &str) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null
    })
}

/// Cloudflare 记录 JSON
pub fn cf_record(id: &str, label: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "type": "CNAME",
        "name": format!("{label}.{DOMAIN}"),
        "content": APP_HOST,
        "ttl": 1,
        "proxied": true
    })
}
