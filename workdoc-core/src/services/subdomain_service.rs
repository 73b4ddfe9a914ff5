//! Subdomain pool manager
//!
//! Hands every new company a subdomain from the persisted candidate pool and
//! moves it to a slug derived from the company name when that slug is free.
//! A move creates the new record before deleting the old one, and the
//! company is only marked `provisioned` on a slug whose record exists.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use workdoc_provider::{DnsProvider, ProviderError};

use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, DEFAULT_POOL_PREFIX};
use crate::types::{
    Company, ExpandPoolResult, PoolFailure, PoolStats, ProvisioningStatus, SubdomainCandidate,
};
use crate::utils::slug::{generate_slug, is_reserved_slug, is_valid_slug};

/// Subdomain pool manager
pub struct SubdomainService {
    ctx: Arc<ServiceContext>,
}

impl SubdomainService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    async fn load_company(&self, company_id: i64) -> CoreResult<Company> {
        self.ctx
            .company_repository
            .find_by_id(company_id)
            .await?
            .ok_or(CoreError::CompanyNotFound(company_id))
    }

    // ===== Assignment =====

    /// Give a company without a subdomain its first one.
    ///
    /// Claims a free candidate (already live in DNS), then tries to move the
    /// company to the slug derived from `company_name`. Returns the live
    /// slug, or `None` when the pool is exhausted.
    pub async fn assign_subdomain_to_company(
        &self,
        company_id: i64,
        company_name: &str,
    ) -> CoreResult<Option<String>> {
        let company = self.load_company(company_id).await?;
        if let Some(slug) = &company.slug {
            return Err(CoreError::ValidationError(format!(
                "company {company_id} already has subdomain '{slug}'"
            )));
        }

        let Some(candidate) = self.claim_free_candidate(company_id).await? else {
            log::warn!("Subdomain pool exhausted, company {company_id} has no subdomain");
            return Ok(None);
        };
        self.ctx
            .company_repository
            .set_live_slug(company_id, &candidate)
            .await?;
        log::info!("Assigned pool subdomain '{candidate}' to company {company_id}");

        let desired = generate_slug(company_name);
        if desired.is_empty() || desired == candidate {
            return Ok(Some(candidate));
        }
        if !self.slug_available_for(&desired, Some(company_id)).await? {
            log::info!(
                "Subdomain '{desired}' is not available, company {company_id} keeps '{candidate}'"
            );
            return Ok(Some(candidate));
        }

        let provider = match self.ctx.dns_provider() {
            Ok(provider) => provider,
            Err(e) => {
                log::warn!("Cannot move company {company_id} to '{desired}': {e}");
                self.ctx
                    .company_repository
                    .mark_failed(company_id, Some(&desired), &e.to_string())
                    .await?;
                return Ok(Some(candidate));
            }
        };

        if self
            .move_subdomain(provider.as_ref(), company_id, Some(&candidate), &desired)
            .await?
        {
            Ok(Some(desired))
        } else {
            Ok(Some(candidate))
        }
    }

    /// Claim the first free candidate; on a lost race try the next one.
    async fn claim_free_candidate(&self, company_id: i64) -> CoreResult<Option<String>> {
        let repository = &self.ctx.candidate_repository;
        for candidate in repository.find_available().await? {
            if repository.claim(&candidate.name, company_id).await? {
                return Ok(Some(candidate.name));
            }
            log::debug!("Candidate '{}' was claimed concurrently", candidate.name);
        }
        Ok(None)
    }

    /// Move a company to a new subdomain.
    ///
    /// Returns `false` when the new record could not be created or the slug
    /// was taken in the meantime; the company then keeps `old` and is marked
    /// `failed`. The old record is deleted only after the new slug is stored.
    async fn move_subdomain(
        &self,
        provider: &dyn DnsProvider,
        company_id: i64,
        old: Option<&str>,
        new: &str,
    ) -> CoreResult<bool> {
        let companies = &self.ctx.company_repository;
        companies.mark_pending(company_id, new).await?;

        if let Err(e) = ensure_record(provider, new).await {
            log_provider_error(
                &format!("Failed to create subdomain '{new}' for company {company_id}"),
                &e,
            );
            companies
                .mark_failed(company_id, Some(new), &e.to_string())
                .await?;
            return Ok(false);
        }

        match companies.set_live_slug(company_id, new).await {
            Ok(()) => {}
            Err(CoreError::SlugUnavailable(_)) => {
                log::warn!(
                    "Subdomain '{new}' was taken by another company, removing the record created for company {company_id}"
                );
                remove_record(provider, new).await;
                companies
                    .mark_failed(
                        company_id,
                        Some(new),
                        "subdomain was claimed by another company",
                    )
                    .await?;
                return Ok(false);
            }
            Err(e) => {
                log::error!("Failed to store subdomain '{new}' for company {company_id}: {e}");
                remove_record(provider, new).await;
                return Err(e);
            }
        }
        log::info!("Company {company_id} provisioned on '{new}'");

        if let Some(old) = old.filter(|old| *old != new) {
            remove_record(provider, old).await;
        }
        Ok(true)
    }

    /// Move a company to `new_slug`.
    ///
    /// Returns `false` when the slug is malformed or taken, or when its
    /// record could not be created.
    pub async fn update_company_subdomain(
        &self,
        company_id: i64,
        new_slug: &str,
    ) -> CoreResult<bool> {
        let company = self.load_company(company_id).await?;
        if company.slug.as_deref() == Some(new_slug) {
            log::info!("Company {company_id} already uses '{new_slug}'");
            return Ok(true);
        }
        if !is_valid_slug(new_slug) {
            log::warn!("Rejected malformed subdomain '{new_slug}' for company {company_id}");
            return Ok(false);
        }
        if !self.slug_available_for(new_slug, Some(company_id)).await? {
            log::warn!("Subdomain '{new_slug}' is not available for company {company_id}");
            return Ok(false);
        }

        let provider = self.ctx.dns_provider()?;
        self.move_subdomain(
            provider.as_ref(),
            company_id,
            company.slug.as_deref(),
            new_slug,
        )
        .await
    }

    // ===== Availability =====

    /// Whether `slug` can be given to a company.
    pub async fn is_slug_available(&self, slug: &str) -> CoreResult<bool> {
        self.slug_available_for(slug, None).await
    }

    /// Availability ignoring the slugs held by `exclude` itself.
    async fn slug_available_for(&self, slug: &str, exclude: Option<i64>) -> CoreResult<bool> {
        if !is_valid_slug(slug) || is_reserved_slug(slug) {
            return Ok(false);
        }
        if self
            .ctx
            .company_repository
            .is_slug_taken(slug, exclude)
            .await?
        {
            return Ok(false);
        }
        Ok(self
            .ctx
            .candidate_repository
            .find_by_name(slug)
            .await?
            .is_none())
    }

    // ===== Pool =====

    pub async fn get_pool_stats(&self) -> CoreResult<PoolStats> {
        self.ctx.candidate_repository.stats().await
    }

    /// Add `count` new candidates.
    ///
    /// Names continue each prefix's numbering (`company8` after `company7`)
    /// and rotate through the configured prefixes. A candidate is stored only
    /// once its record exists.
    pub async fn expand_subdomain_pool(&self, count: usize) -> CoreResult<ExpandPoolResult> {
        let provider = self.ctx.dns_provider()?;
        let settings = self.ctx.pool_settings();

        let mut prefixes: Vec<&str> = settings
            .prefixes
            .iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
        if prefixes.is_empty() {
            prefixes.push(DEFAULT_POOL_PREFIX);
        }

        let existing = self.ctx.candidate_repository.find_all().await?;
        let mut counters: HashMap<&str, u64> = prefixes
            .iter()
            .map(|prefix| (*prefix, highest_suffix(prefix, &existing)))
            .collect();

        let mut result = ExpandPoolResult::default();
        for (i, prefix) in prefixes.iter().cycle().take(count).enumerate() {
            let counter = counters.entry(*prefix).or_insert(0);
            let name = self.next_free_name(prefix, counter).await?;

            if i > 0 {
                pace(settings.setup_delay).await;
            }
            match ensure_record(provider.as_ref(), &name).await {
                Ok(()) => {
                    self.ctx.candidate_repository.insert(&name).await?;
                    result.created.push(name);
                }
                Err(e) => {
                    log_provider_error(&format!("Failed to create pool subdomain '{name}'"), &e);
                    result.failed.push(PoolFailure {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Pool expansion finished: {} created, {} failed",
            result.created.len(),
            result.failed.len()
        );
        Ok(result)
    }

    /// Next `{prefix}{n}` that no company or candidate uses.
    async fn next_free_name(&self, prefix: &str, counter: &mut u64) -> CoreResult<String> {
        loop {
            *counter += 1;
            let name = format!("{prefix}{counter}");
            if is_reserved_slug(&name)
                || self
                    .ctx
                    .company_repository
                    .is_slug_taken(&name, None)
                    .await?
                || self
                    .ctx
                    .candidate_repository
                    .find_by_name(&name)
                    .await?
                    .is_some()
            {
                continue;
            }
            return Ok(name);
        }
    }

    /// Bulk pool setup from explicit names.
    ///
    /// Names already in the pool are skipped. An existing DNS record is
    /// reused, otherwise one is created; the candidate is stored on success.
    pub async fn setup_pool(&self, names: &[String]) -> CoreResult<ExpandPoolResult> {
        let provider = self.ctx.dns_provider()?;
        let delay = self.ctx.pool_settings().setup_delay;

        let mut result = ExpandPoolResult::default();
        let mut seen = HashSet::new();
        let mut first_call = true;

        for name in names {
            let name = name.trim().to_ascii_lowercase();
            if !seen.insert(name.clone()) {
                continue;
            }
            if self
                .ctx
                .candidate_repository
                .find_by_name(&name)
                .await?
                .is_some()
            {
                result.skipped.push(name);
                continue;
            }
            if !is_valid_slug(&name) || is_reserved_slug(&name) {
                result.failed.push(PoolFailure {
                    error: format!("'{name}' is not a usable subdomain label"),
                    name,
                });
                continue;
            }
            if self
                .ctx
                .company_repository
                .is_slug_taken(&name, None)
                .await?
            {
                result.failed.push(PoolFailure {
                    error: format!("'{name}' is already used by a company"),
                    name,
                });
                continue;
            }

            if !first_call {
                pace(delay).await;
            }
            first_call = false;

            let outcome = match provider.find_subdomain(&name).await {
                Ok(Some(_)) => Ok(true),
                Ok(None) => provider.create_subdomain(&name).await.map(|_| false),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(reused) => {
                    self.ctx.candidate_repository.insert(&name).await?;
                    if reused {
                        log::info!("Reusing existing record for pool subdomain '{name}'");
                        result.reused.push(name);
                    } else {
                        result.created.push(name);
                    }
                }
                Err(e) => {
                    log_provider_error(&format!("Failed to set up pool subdomain '{name}'"), &e);
                    result.failed.push(PoolFailure {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Pool setup finished: {} created, {} reused, {} skipped, {} failed",
            result.created.len(),
            result.reused.len(),
            result.skipped.len(),
            result.failed.len()
        );
        Ok(result)
    }

    // ===== Operator queue =====

    /// Companies whose provisioning failed.
    pub async fn list_failed_provisioning(&self) -> CoreResult<Vec<Company>> {
        self.ctx
            .company_repository
            .find_by_status(ProvisioningStatus::Failed)
            .await
    }

    /// Re-run provisioning for a company that is not `provisioned`.
    ///
    /// A company without any subdomain goes through assignment again;
    /// otherwise the requested slug is provisioned.
    pub async fn retry_provisioning(&self, company_id: i64) -> CoreResult<bool> {
        let company = self.load_company(company_id).await?;
        if company.provisioning_status == ProvisioningStatus::Provisioned {
            return Err(CoreError::ValidationError(format!(
                "company {company_id} is already provisioned"
            )));
        }

        log::info!("Retrying provisioning for company {company_id}");
        match (company.slug.as_deref(), company.requested_slug.as_deref()) {
            (None, _) => Ok(self
                .assign_subdomain_to_company(company_id, &company.name)
                .await?
                .is_some()),
            (Some(_), Some(requested)) => {
                self.update_company_subdomain(company_id, requested).await
            }
            (Some(_), None) => Err(CoreError::ValidationError(format!(
                "company {company_id} has no requested subdomain to retry"
            ))),
        }
    }
}

/// Highest numeric suffix among candidates named `{prefix}{n}`.
fn highest_suffix(prefix: &str, candidates: &[SubdomainCandidate]) -> u64 {
    candidates
        .iter()
        .filter_map(|c| c.name.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Create the record for `name`, accepting one that already exists.
///
/// A create whose response was lost (gateway timeout, retried request) can
/// leave the record in place, so `RecordExists` is resolved with a lookup.
async fn ensure_record(provider: &dyn DnsProvider, name: &str) -> Result<(), ProviderError> {
    match provider.create_subdomain(name).await {
        Ok(_) => Ok(()),
        Err(e @ ProviderError::RecordExists { .. }) => match provider.find_subdomain(name).await {
            Ok(Some(_)) => {
                log::info!("DNS record for '{name}' already exists, using it");
                Ok(())
            }
            Ok(None) | Err(_) => Err(e),
        },
        Err(e) => Err(e),
    }
}

/// Delete a record, logging instead of failing.
async fn remove_record(provider: &dyn DnsProvider, name: &str) {
    match provider.delete_subdomain(name).await {
        Ok(()) => log::info!("Deleted DNS record for '{name}'"),
        Err(e) => log::warn!("Failed to delete DNS record for '{name}': {e}"),
    }
}

fn log_provider_error(context: &str, err: &ProviderError) {
    if err.is_expected() {
        log::warn!("{context}: {err}");
    } else {
        log::error!("{context}: {err}");
    }
}
