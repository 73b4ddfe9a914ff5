//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use workdoc_provider::{
    DnsProvider, DnsRecord, DnsRecordType, ProviderError, ProviderMetadata, ProviderType,
    SubdomainTarget,
};

use crate::error::{CoreError, CoreResult};
use crate::services::{PoolSettings, ServiceContext};
use crate::traits::{CandidateRepository, CompanyRepository, DocumentRepository, LanguageModel};
use crate::types::{
    Company, CompletionRequest, GeneratedDocument, PoolStats, ProvisioningStatus,
    SubdomainCandidate,
};

// ===== MockCompanyRepository =====

pub struct MockCompanyRepository {
    companies: RwLock<BTreeMap<i64, Company>>,
    next_id: AtomicI64,
    /// 为 true 时下一次 `set_live_slug` 返回 `SlugUnavailable`（模拟并发抢占）
    lose_next_slug_race: AtomicBool,
}

impl MockCompanyRepository {
    pub fn new() -> Self {
        Self {
            companies: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            lose_next_slug_race: AtomicBool::new(false),
        }
    }

    /// 以指定 ID 插入公司
    pub async fn insert_with_id(&self, id: i64, name: &str) -> Company {
        let now = Utc::now();
        let company = Company {
            id,
            name: name.to_string(),
            slug: None,
            requested_slug: None,
            provisioning_status: ProvisioningStatus::Pending,
            provisioning_error: None,
            created_at: now,
            updated_at: now,
        };
        self.companies.write().await.insert(id, company.clone());
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
        company
    }

    pub fn lose_next_slug_race(&self) {
        self.lose_next_slug_race.store(true, Ordering::SeqCst);
    }

    pub async fn get(&self, id: i64) -> Option<Company> {
        self.companies.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl CompanyRepository for MockCompanyRepository {
    async fn insert(&self, name: &str) -> CoreResult<Company> {
        let id = self.next_id.load(Ordering::SeqCst);
        Ok(self.insert_with_id(id, name).await)
    }

    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Company>> {
        Ok(self.get(id).await)
    }

    async fn find_by_status(&self, status: ProvisioningStatus) -> CoreResult<Vec<Company>> {
        Ok(self
            .companies
            .read()
            .await
            .values()
            .filter(|c| c.provisioning_status == status)
            .cloned()
            .collect())
    }

    async fn is_slug_taken(&self, slug: &str, exclude: Option<i64>) -> CoreResult<bool> {
        Ok(self.companies.read().await.values().any(|c| {
            Some(c.id) != exclude
                && (c.slug.as_deref() == Some(slug) || c.requested_slug.as_deref() == Some(slug))
        }))
    }

    async fn set_live_slug(&self, id: i64, slug: &str) -> CoreResult<()> {
        if self.lose_next_slug_race.swap(false, Ordering::SeqCst) {
            return Err(CoreError::SlugUnavailable(slug.to_string()));
        }
        let mut companies = self.companies.write().await;
        if companies
            .values()
            .any(|c| c.id != id && c.slug.as_deref() == Some(slug))
        {
            return Err(CoreError::SlugUnavailable(slug.to_string()));
        }
        let company = companies.get_mut(&id).ok_or(CoreError::CompanyNotFound(id))?;
        company.slug = Some(slug.to_string());
        company.requested_slug = None;
        company.provisioning_status = ProvisioningStatus::Provisioned;
        company.provisioning_error = None;
        company.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_pending(&self, id: i64, requested_slug: &str) -> CoreResult<()> {
        let mut companies = self.companies.write().await;
        let company = companies.get_mut(&id).ok_or(CoreError::CompanyNotFound(id))?;
        company.requested_slug = Some(requested_slug.to_string());
        company.provisioning_status = ProvisioningStatus::Pending;
        company.provisioning_error = None;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: i64,
        requested_slug: Option<&str>,
        error: &str,
    ) -> CoreResult<()> {
        let mut companies = self.companies.write().await;
        let company = companies.get_mut(&id).ok_or(CoreError::CompanyNotFound(id))?;
        company.requested_slug = requested_slug.map(ToString::to_string);
        company.provisioning_status = ProvisioningStatus::Failed;
        company.provisioning_error = Some(error.to_string());
        Ok(())
    }
}

// ===== MockCandidateRepository =====

pub struct MockCandidateRepository {
    candidates: RwLock<Vec<SubdomainCandidate>>,
}

impl MockCandidateRepository {
    pub fn new() -> Self {
        Self {
            candidates: RwLock::new(Vec::new()),
        }
    }

    pub async fn seed(&self, names: &[&str]) {
        for name in names {
            let _ = self.insert(name).await;
        }
    }

    pub async fn owner_of(&self, name: &str) -> Option<i64> {
        self.candidates
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.company_id)
    }
}

#[async_trait]
impl CandidateRepository for MockCandidateRepository {
    async fn insert(&self, name: &str) -> CoreResult<SubdomainCandidate> {
        let mut candidates = self.candidates.write().await;
        if candidates.iter().any(|c| c.name == name) {
            return Err(CoreError::StorageError(format!("duplicate candidate {name}")));
        }
        let candidate = SubdomainCandidate {
            id: i64::try_from(candidates.len()).unwrap_or_default() + 1,
            name: name.to_string(),
            company_id: None,
            created_at: Utc::now(),
            assigned_at: None,
        };
        candidates.push(candidate.clone());
        Ok(candidate)
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<SubdomainCandidate>> {
        Ok(self
            .candidates
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn find_all(&self) -> CoreResult<Vec<SubdomainCandidate>> {
        Ok(self.candidates.read().await.clone())
    }

    async fn find_available(&self) -> CoreResult<Vec<SubdomainCandidate>> {
        Ok(self
            .candidates
            .read()
            .await
            .iter()
            .filter(|c| !c.is_assigned())
            .cloned()
            .collect())
    }

    async fn claim(&self, name: &str, company_id: i64) -> CoreResult<bool> {
        let mut candidates = self.candidates.write().await;
        match candidates
            .iter_mut()
            .find(|c| c.name == name && c.company_id.is_none())
        {
            Some(candidate) => {
                candidate.company_id = Some(company_id);
                candidate.assigned_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn stats(&self) -> CoreResult<PoolStats> {
        let candidates = self.candidates.read().await;
        let total = candidates.len() as u64;
        let assigned = candidates.iter().filter(|c| c.is_assigned()).count() as u64;
        Ok(PoolStats {
            total,
            available: total - assigned,
            assigned,
        })
    }
}

// ===== MockDocumentRepository =====

pub struct MockDocumentRepository {
    documents: RwLock<Vec<GeneratedDocument>>,
}

impl MockDocumentRepository {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentRepository for MockDocumentRepository {
    async fn insert(&self, document: &GeneratedDocument) -> CoreResult<()> {
        self.documents.write().await.push(document.clone());
        Ok(())
    }

    async fn find_by_company(&self, company_id: i64) -> CoreResult<Vec<GeneratedDocument>> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .rev()
            .filter(|d| d.company_id == company_id)
            .cloned()
            .collect())
    }
}

// ===== MockDnsProvider =====

/// 内存 DNS Provider，记录每次调用（`create:x` / `delete:x` / `find:x`）
pub struct MockDnsProvider {
    target: SubdomainTarget,
    records: RwLock<BTreeMap<String, DnsRecord>>,
    calls: RwLock<Vec<String>>,
    fail_create: RwLock<HashSet<String>>,
    fail_delete: RwLock<HashSet<String>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            target: SubdomainTarget {
                domain: "workdoc360.com".to_string(),
                content: "app.workdoc360.com".to_string(),
                record_type: DnsRecordType::Cname,
                ttl: 600,
                proxied: None,
            },
            records: RwLock::new(BTreeMap::new()),
            calls: RwLock::new(Vec::new()),
            fail_create: RwLock::new(HashSet::new()),
            fail_delete: RwLock::new(HashSet::new()),
        }
    }

    /// 预置已存在的记录（不计入调用日志）
    pub async fn with_records(self, names: &[&str]) -> Self {
        {
            let mut records = self.records.write().await;
            for name in names {
                records.insert((*name).to_string(), self.record(name));
            }
        }
        self
    }

    pub async fn fail_create_for(&self, name: &str) {
        self.fail_create.write().await.insert(name.to_string());
    }

    pub async fn recover_create_for(&self, name: &str) {
        self.fail_create.write().await.remove(name);
    }

    pub async fn fail_delete_for(&self, name: &str) {
        self.fail_delete.write().await.insert(name.to_string());
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn has_record(&self, name: &str) -> bool {
        self.records.read().await.contains_key(name)
    }

    fn record(&self, name: &str) -> DnsRecord {
        DnsRecord {
            id: format!("rec-{name}"),
            name: name.to_string(),
            record_type: self.target.record_type,
            content: self.target.content.clone(),
            ttl: self.target.ttl,
            proxied: None,
        }
    }

    fn outage(name: &str) -> ProviderError {
        ProviderError::NetworkError {
            provider: "mock".to_string(),
            detail: format!("simulated outage for {name}"),
        }
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Cloudflare,
            name: "Mock".to_string(),
            description: "In-memory provider for tests".to_string(),
            required_fields: Vec::new(),
        }
    }

    fn target(&self) -> &SubdomainTarget {
        &self.target
    }

    async fn test_connection(&self) -> workdoc_provider::Result<bool> {
        Ok(true)
    }

    async fn list_subdomains(&self) -> workdoc_provider::Result<Vec<DnsRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_subdomain(&self, name: &str) -> workdoc_provider::Result<Option<DnsRecord>> {
        self.calls.write().await.push(format!("find:{name}"));
        Ok(self.records.read().await.get(name).cloned())
    }

    async fn create_subdomain(&self, name: &str) -> workdoc_provider::Result<DnsRecord> {
        self.calls.write().await.push(format!("create:{name}"));
        if self.fail_create.read().await.contains(name) {
            return Err(Self::outage(name));
        }
        let mut records = self.records.write().await;
        if records.contains_key(name) {
            return Err(ProviderError::RecordExists {
                provider: "mock".to_string(),
                record_name: name.to_string(),
                raw_message: None,
            });
        }
        let record = self.record(name);
        records.insert(name.to_string(), record.clone());
        Ok(record)
    }

    async fn delete_subdomain(&self, name: &str) -> workdoc_provider::Result<()> {
        self.calls.write().await.push(format!("delete:{name}"));
        if self.fail_delete.read().await.contains(name) {
            return Err(Self::outage(name));
        }
        match self.records.write().await.remove(name) {
            Some(_) => Ok(()),
            None => Err(ProviderError::RecordNotFound {
                provider: "mock".to_string(),
                record_id: name.to_string(),
                raw_message: None,
            }),
        }
    }
}

// ===== MockLanguageModel =====

pub struct MockLanguageModel {
    response: Option<String>,
    requests: RwLock<Vec<CompletionRequest>>,
}

impl MockLanguageModel {
    /// 每次返回固定文本
    pub fn replying(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// 每次调用都失败
    pub fn failing() -> Self {
        Self {
            response: None,
            requests: RwLock::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> CoreResult<String> {
        self.requests.write().await.push(request);
        self.response
            .clone()
            .ok_or_else(|| CoreError::LanguageModel("mock model unavailable".to_string()))
    }
}

// ===== 测试环境 =====

/// 组装好的测试上下文，保留各 mock 的具体类型以便断言
pub struct TestEnv {
    pub companies: Arc<MockCompanyRepository>,
    pub candidates: Arc<MockCandidateRepository>,
    pub documents: Arc<MockDocumentRepository>,
    pub dns: Arc<MockDnsProvider>,
    pub ctx: Arc<ServiceContext>,
}

impl TestEnv {
    /// 无延迟、带 mock DNS 的上下文
    pub fn new(dns: MockDnsProvider) -> Self {
        Self::build(dns, None, Duration::ZERO)
    }

    pub fn with_model(dns: MockDnsProvider, model: Arc<MockLanguageModel>) -> Self {
        Self::build(dns, Some(model), Duration::ZERO)
    }

    pub fn with_delay(dns: MockDnsProvider, delay: Duration) -> Self {
        Self::build(dns, None, delay)
    }

    fn build(
        dns: MockDnsProvider,
        model: Option<Arc<MockLanguageModel>>,
        setup_delay: Duration,
    ) -> Self {
        let companies = Arc::new(MockCompanyRepository::new());
        let candidates = Arc::new(MockCandidateRepository::new());
        let documents = Arc::new(MockDocumentRepository::new());
        let dns = Arc::new(dns);

        let mut ctx = ServiceContext::new(companies.clone(), candidates.clone(), documents.clone())
            .with_dns_provider(dns.clone())
            .with_pool_settings(PoolSettings {
                prefixes: vec!["company".to_string()],
                setup_delay,
            });
        if let Some(model) = model {
            ctx = ctx.with_language_model(model);
        }

        Self {
            companies,
            candidates,
            documents,
            dns,
            ctx: Arc::new(ctx),
        }
    }
}
