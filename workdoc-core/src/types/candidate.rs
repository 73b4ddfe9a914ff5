//! 子域名池类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 预留的子域名候选
///
/// 池初始化或扩容时写入，被分配后记录所属公司，永不删除。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubdomainCandidate {
    /// 候选 ID
    pub id: i64,
    /// 子域名标签（唯一）
    pub name: String,
    /// 所属公司
    #[serde(rename = "companyId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    /// 创建时间
    #[serde(rename = "createdAt")]
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// 分配时间
    #[serde(rename = "assignedAt")]
    #[serde(with = "crate::utils::datetime::option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
}

impl SubdomainCandidate {
    /// 是否已分配给公司
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.company_id.is_some()
    }
}

/// 池统计
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolStats {
    pub total: u64,
    pub available: u64,
    pub assigned: u64,
}

/// 单个名称的失败原因
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolFailure {
    pub name: String,
    pub error: String,
}

/// 池扩容 / 初始化结果
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpandPoolResult {
    /// 新建 DNS 记录并入池的名称
    pub created: Vec<String>,
    /// DNS 记录已存在、直接入池的名称
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reused: Vec<String>,
    /// 已在池中、未做任何操作的名称
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    /// 失败的名称
    pub failed: Vec<PoolFailure>,
}

impl ExpandPoolResult {
    /// 入池的名称总数
    #[must_use]
    pub fn added(&self) -> usize {
        self.created.len() + self.reused.len()
    }
}
