//! Company persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Company, ProvisioningStatus};

/// Company record store
///
/// The `slug` column is unique; writers that lose a race on it get
/// [`CoreError::SlugUnavailable`](crate::CoreError::SlugUnavailable).
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a new company in `pending` state without a slug.
    async fn insert(&self, name: &str) -> CoreResult<Company>;

    /// Get company by ID
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Company>>;

    /// Companies in the given provisioning state, oldest first.
    async fn find_by_status(&self, status: ProvisioningStatus) -> CoreResult<Vec<Company>>;

    /// Whether any company other than `exclude` holds `slug` as its live
    /// or requested slug.
    async fn is_slug_taken(&self, slug: &str, exclude: Option<i64>) -> CoreResult<bool>;

    /// Make `slug` the live slug: status `provisioned`, requested slug and
    /// error cleared.
    ///
    /// # Errors
    /// `SlugUnavailable` when another company already holds `slug`.
    async fn set_live_slug(&self, id: i64, slug: &str) -> CoreResult<()>;

    /// Record the slug about to be provisioned and move to `pending`.
    async fn mark_pending(&self, id: i64, requested_slug: &str) -> CoreResult<()>;

    /// Move to `failed`, keeping the live slug untouched.
    async fn mark_failed(
        &self,
        id: i64,
        requested_slug: Option<&str>,
        error: &str,
    ) -> CoreResult<()>;
}
