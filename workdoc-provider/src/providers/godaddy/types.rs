//! GoDaddy API 类型定义

use serde::{Deserialize, Serialize};

/// GoDaddy 错误响应
#[derive(Debug, Deserialize)]
pub struct GodaddyErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// `GET /domains/{domain}` 响应（只取用到的字段）
#[derive(Debug, Deserialize)]
pub struct GodaddyDomain {
    pub domain: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// GoDaddy DNS 记录（请求与响应共用）
#[derive(Debug, Serialize, Deserialize)]
pub struct GodaddyRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    pub ttl: u32,
}
