//! 类型定义模块

mod candidate;
mod card;
mod company;
mod document;
mod llm;

pub use candidate::{ExpandPoolResult, PoolFailure, PoolStats, SubdomainCandidate};
pub use card::{
    CardAnalysis, CardStatus, CardVerificationResult, VisualAuthenticity, NOT_VISIBLE,
};
pub use company::{Company, ProvisioningStatus};
pub use document::{DocumentRequest, DocumentType, GeneratedDocument};
pub use llm::{CompletionRequest, ImageInput};

// Re-export provider 库的公共类型
pub use workdoc_provider::{
    DnsRecord, DnsRecordType, ProviderCredentials, ProviderMetadata, ProviderType,
    SubdomainTarget,
};
