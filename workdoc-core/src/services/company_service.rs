//! 公司注册服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_core_error, ServiceContext, SubdomainService};
use crate::types::Company;

/// 公司服务
pub struct CompanyService {
    ctx: Arc<ServiceContext>,
    subdomains: SubdomainService,
}

impl CompanyService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            subdomains: SubdomainService::new(ctx.clone()),
            ctx,
        }
    }

    /// Register a company and provision its subdomain.
    ///
    /// Provisioning problems do not fail the registration: the company is
    /// returned with status `failed` and shows up in the operator queue.
    pub async fn register_company(&self, name: &str) -> CoreResult<Company> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError(
                "company name must not be empty".to_string(),
            ));
        }

        let company = self.ctx.company_repository.insert(name).await?;
        log::info!("Registered company {} '{}'", company.id, company.name);

        match self
            .subdomains
            .assign_subdomain_to_company(company.id, name)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.ctx
                    .company_repository
                    .mark_failed(company.id, None, "subdomain pool exhausted")
                    .await?;
            }
            Err(e) => {
                log_core_error(
                    &format!("Subdomain provisioning failed for company {}", company.id),
                    &e,
                );
                self.ctx
                    .company_repository
                    .mark_failed(company.id, None, &e.to_string())
                    .await?;
            }
        }

        self.get_company(company.id).await
    }

    pub async fn get_company(&self, company_id: i64) -> CoreResult<Company> {
        self.ctx
            .company_repository
            .find_by_id(company_id)
            .await?
            .ok_or(CoreError::CompanyNotFound(company_id))
    }
}
