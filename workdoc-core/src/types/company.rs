//! 公司相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 子域名开通状态
///
/// `Pending` -> `Provisioned` 仅在 DNS 记录确认创建后发生；
/// DNS 调用失败进入 `Failed`，由运维重试。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningStatus {
    /// 等待 DNS 记录创建
    Pending,
    /// slug 对应的 DNS 记录已存在
    Provisioned,
    /// DNS 调用失败，等待运维处理
    Failed,
}

impl ProvisioningStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Provisioned => "provisioned",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProvisioningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "provisioned" => Ok(Self::Provisioned),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown provisioning status: {other}")),
        }
    }
}

/// 公司（租户）记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    /// 公司 ID
    pub id: i64,
    /// 公司名称
    pub name: String,
    /// 当前生效的子域名（全局唯一）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// 期望但尚未开通的子域名
    #[serde(rename = "requestedSlug")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_slug: Option<String>,
    /// 开通状态
    #[serde(rename = "provisioningStatus")]
    pub provisioning_status: ProvisioningStatus,
    /// 最近一次开通失败的原因
    #[serde(rename = "provisioningError")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_error: Option<String>,
    /// 创建时间
    #[serde(rename = "createdAt")]
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// 更新时间
    #[serde(rename = "updatedAt")]
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            ProvisioningStatus::Pending,
            ProvisioningStatus::Provisioned,
            ProvisioningStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ProvisioningStatus>(), Ok(status));
        }
        assert!("done".parse::<ProvisioningStatus>().is_err());
    }
}
