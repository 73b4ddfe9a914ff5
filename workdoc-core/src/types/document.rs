//! 文档生成类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 支持生成的文档类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    RiskAssessment,
    MethodStatement,
    Iso9001Template,
}

impl DocumentType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RiskAssessment => "risk_assessment",
            Self::MethodStatement => "method_statement",
            Self::Iso9001Template => "iso9001_template",
        }
    }

    /// 文档标题前缀
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::RiskAssessment => "Risk Assessment",
            Self::MethodStatement => "Method Statement",
            Self::Iso9001Template => "ISO 9001 Quality Manual",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "risk_assessment" => Ok(Self::RiskAssessment),
            "method_statement" => Ok(Self::MethodStatement),
            "iso9001_template" | "iso9001" => Ok(Self::Iso9001Template),
            other => Err(format!("unknown document type: {other}")),
        }
    }
}

/// 文档生成请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub document_type: DocumentType,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub site_address: Option<String>,
    #[serde(default)]
    pub trade: Option<String>,
    #[serde(default)]
    pub additional_details: Option<String>,
}

impl DocumentRequest {
    #[must_use]
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            project_name: None,
            site_address: None,
            trade: None,
            additional_details: None,
        }
    }
}

/// 已生成的文档，内容为模型原样输出
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedDocument {
    /// 文档 ID (UUID)
    pub id: String,
    #[serde(rename = "companyId")]
    pub company_id: i64,
    #[serde(rename = "documentType")]
    pub document_type: DocumentType,
    pub title: String,
    pub content: String,
    /// 内容的 SHA-256（hex）
    #[serde(rename = "contentHash")]
    pub content_hash: String,
    /// 生成所用模型
    pub model: String,
    #[serde(rename = "createdAt")]
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}
