//! Subdomain candidate persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{PoolStats, SubdomainCandidate};

/// Durable pool of reservable subdomain names
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Add an unassigned candidate.
    async fn insert(&self, name: &str) -> CoreResult<SubdomainCandidate>;

    /// Get candidate by name
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<SubdomainCandidate>>;

    /// All candidates, in insertion order.
    async fn find_all(&self) -> CoreResult<Vec<SubdomainCandidate>>;

    /// Unassigned candidates, in insertion order.
    async fn find_available(&self) -> CoreResult<Vec<SubdomainCandidate>>;

    /// Atomically assign `name` to `company_id`.
    ///
    /// Succeeds only while the candidate is unassigned; returns `false`
    /// when another caller claimed it first.
    async fn claim(&self, name: &str, company_id: i64) -> CoreResult<bool>;

    /// Counts computed by the store.
    async fn stats(&self) -> CoreResult<PoolStats>;
}
