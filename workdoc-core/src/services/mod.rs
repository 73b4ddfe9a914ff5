//! 业务逻辑服务层

mod card_verification_service;
mod company_service;
mod document_service;
mod subdomain_service;

pub use card_verification_service::CardVerificationService;
pub use company_service::CompanyService;
pub use document_service::{content_hash, DocumentService};
pub use subdomain_service::SubdomainService;

use std::sync::Arc;
use std::time::Duration;

use workdoc_provider::DnsProvider;

use crate::error::{CoreError, CoreResult};
use crate::traits::{CandidateRepository, CompanyRepository, DocumentRepository, LanguageModel};

/// 默认候选名前缀
pub const DEFAULT_POOL_PREFIX: &str = "company";
/// 批量 DNS 调用之间的默认间隔
pub const DEFAULT_SETUP_DELAY: Duration = Duration::from_millis(2000);

/// 子域名池配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// 扩容时使用的名称前缀，轮流分配
    pub prefixes: Vec<String>,
    /// 批量初始化 / 扩容时两次 DNS 调用之间的固定间隔
    pub setup_delay: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            prefixes: vec![DEFAULT_POOL_PREFIX.to_string()],
            setup_delay: DEFAULT_SETUP_DELAY,
        }
    }
}

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。DNS Provider 与
/// 语言模型可选：未配置时相关操作返回 `DnsProviderUnavailable` /
/// `LanguageModelUnavailable`。
pub struct ServiceContext {
    /// 公司仓库
    pub company_repository: Arc<dyn CompanyRepository>,
    /// 子域名候选仓库
    pub candidate_repository: Arc<dyn CandidateRepository>,
    /// 生成文档仓库
    pub document_repository: Arc<dyn DocumentRepository>,
    dns_provider: Option<Arc<dyn DnsProvider>>,
    language_model: Option<Arc<dyn LanguageModel>>,
    pool_settings: PoolSettings,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        company_repository: Arc<dyn CompanyRepository>,
        candidate_repository: Arc<dyn CandidateRepository>,
        document_repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            company_repository,
            candidate_repository,
            document_repository,
            dns_provider: None,
            language_model: None,
            pool_settings: PoolSettings::default(),
        }
    }

    #[must_use]
    pub fn with_dns_provider(mut self, provider: Arc<dyn DnsProvider>) -> Self {
        self.dns_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn with_language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.language_model = Some(model);
        self
    }

    #[must_use]
    pub fn with_pool_settings(mut self, settings: PoolSettings) -> Self {
        self.pool_settings = settings;
        self
    }

    /// 获取 DNS Provider 实例
    pub fn dns_provider(&self) -> CoreResult<Arc<dyn DnsProvider>> {
        self.dns_provider
            .clone()
            .ok_or(CoreError::DnsProviderUnavailable)
    }

    /// 获取语言模型实例
    pub fn language_model(&self) -> CoreResult<Arc<dyn LanguageModel>> {
        self.language_model
            .clone()
            .ok_or(CoreError::LanguageModelUnavailable)
    }

    #[must_use]
    pub fn pool_settings(&self) -> &PoolSettings {
        &self.pool_settings
    }
}

/// 按错误性质选择日志级别
pub(crate) fn log_core_error(context: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("{context}: {err}");
    } else {
        log::error!("{context}: {err}");
    }
}
