//! Generated document persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::GeneratedDocument;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Save a generated document
    async fn insert(&self, document: &GeneratedDocument) -> CoreResult<()>;

    /// Documents for a company, newest first.
    async fn find_by_company(&self, company_id: i64) -> CoreResult<Vec<GeneratedDocument>>;
}
