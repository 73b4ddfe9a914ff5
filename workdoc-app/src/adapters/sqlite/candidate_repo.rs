//! `CandidateRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use workdoc_core::error::{CoreError, CoreResult};
use workdoc_core::traits::CandidateRepository;
use workdoc_core::types::{PoolStats, SubdomainCandidate};

use super::entity::subdomain_candidate;
use super::{is_unique_violation, parse_timestamp, storage_error, SqliteStore};

impl subdomain_candidate::Model {
    fn into_candidate(self) -> CoreResult<SubdomainCandidate> {
        let assigned_at = self
            .assigned_at
            .map(|s| parse_timestamp("assigned_at", &s))
            .transpose()?;

        Ok(SubdomainCandidate {
            id: self.id,
            name: self.name,
            company_id: self.company_id,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            assigned_at,
        })
    }
}

#[async_trait]
impl CandidateRepository for SqliteStore {
    async fn insert(&self, name: &str) -> CoreResult<SubdomainCandidate> {
        let model = subdomain_candidate::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            company_id: Set(None),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            assigned_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CoreError::ValidationError(format!("'{name}' is already in the pool"))
            } else {
                storage_error("insert candidate", &e)
            }
        })?;

        model.into_candidate()
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<SubdomainCandidate>> {
        let row = subdomain_candidate::Entity::find()
            .filter(subdomain_candidate::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| storage_error("query candidate", &e))?;

        row.map(subdomain_candidate::Model::into_candidate)
            .transpose()
    }

    async fn find_all(&self) -> CoreResult<Vec<SubdomainCandidate>> {
        let rows = subdomain_candidate::Entity::find()
            .order_by_asc(subdomain_candidate::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error("query candidates", &e))?;

        rows.into_iter()
            .map(subdomain_candidate::Model::into_candidate)
            .collect()
    }

    async fn find_available(&self) -> CoreResult<Vec<SubdomainCandidate>> {
        let rows = subdomain_candidate::Entity::find()
            .filter(subdomain_candidate::Column::CompanyId.is_null())
            .order_by_asc(subdomain_candidate::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error("query candidates", &e))?;

        rows.into_iter()
            .map(subdomain_candidate::Model::into_candidate)
            .collect()
    }

    async fn claim(&self, name: &str, company_id: i64) -> CoreResult<bool> {
        // 条件更新：只有 company_id 仍为空的行会被改写
        let result = subdomain_candidate::Entity::update_many()
            .col_expr(
                subdomain_candidate::Column::CompanyId,
                Expr::value(company_id),
            )
            .col_expr(
                subdomain_candidate::Column::AssignedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(subdomain_candidate::Column::Name.eq(name))
            .filter(subdomain_candidate::Column::CompanyId.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| storage_error("claim candidate", &e))?;

        Ok(result.rows_affected == 1)
    }

    async fn stats(&self) -> CoreResult<PoolStats> {
        let total = subdomain_candidate::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| storage_error("count candidates", &e))?;
        let assigned = subdomain_candidate::Entity::find()
            .filter(subdomain_candidate::Column::CompanyId.is_not_null())
            .count(&self.db)
            .await
            .map_err(|e| storage_error("count candidates", &e))?;

        Ok(PoolStats {
            total,
            available: total.saturating_sub(assigned),
            assigned,
        })
    }
}
