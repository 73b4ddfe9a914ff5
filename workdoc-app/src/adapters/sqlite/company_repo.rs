//! `CompanyRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use workdoc_core::error::{CoreError, CoreResult};
use workdoc_core::traits::CompanyRepository;
use workdoc_core::types::{Company, ProvisioningStatus};

use super::entity::company;
use super::{is_unique_violation, parse_timestamp, storage_error, SqliteStore};

impl company::Model {
    /// Convert a `SeaORM` row model into a domain `Company`.
    fn into_company(self) -> CoreResult<Company> {
        let provisioning_status = self
            .provisioning_status
            .parse::<ProvisioningStatus>()
            .map_err(CoreError::SerializationError)?;

        Ok(Company {
            id: self.id,
            name: self.name,
            slug: self.slug,
            requested_slug: self.requested_slug,
            provisioning_status,
            provisioning_error: self.provisioning_error,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

impl SqliteStore {
    async fn company_model(&self, id: i64) -> CoreResult<company::Model> {
        company::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| storage_error("query company", &e))?
            .ok_or(CoreError::CompanyNotFound(id))
    }
}

#[async_trait]
impl CompanyRepository for SqliteStore {
    async fn insert(&self, name: &str) -> CoreResult<Company> {
        let now = chrono::Utc::now().to_rfc3339();
        let model = company::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            slug: Set(None),
            requested_slug: Set(None),
            provisioning_status: Set(ProvisioningStatus::Pending.as_str().to_string()),
            provisioning_error: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| storage_error("insert company", &e))?;

        model.into_company()
    }

    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Company>> {
        let row = company::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| storage_error("query company", &e))?;

        row.map(company::Model::into_company).transpose()
    }

    async fn find_by_status(&self, status: ProvisioningStatus) -> CoreResult<Vec<Company>> {
        let rows = company::Entity::find()
            .filter(company::Column::ProvisioningStatus.eq(status.as_str()))
            .order_by_asc(company::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error("query companies", &e))?;

        rows.into_iter().map(company::Model::into_company).collect()
    }

    async fn is_slug_taken(&self, slug: &str, exclude: Option<i64>) -> CoreResult<bool> {
        let mut query = company::Entity::find().filter(
            Condition::any()
                .add(company::Column::Slug.eq(slug))
                .add(company::Column::RequestedSlug.eq(slug)),
        );
        if let Some(id) = exclude {
            query = query.filter(company::Column::Id.ne(id));
        }

        let count = query
            .count(&self.db)
            .await
            .map_err(|e| storage_error("check slug", &e))?;
        Ok(count > 0)
    }

    async fn set_live_slug(&self, id: i64, slug: &str) -> CoreResult<()> {
        let mut active: company::ActiveModel = self.company_model(id).await?.into();
        active.slug = Set(Some(slug.to_string()));
        active.requested_slug = Set(None);
        active.provisioning_status = Set(ProvisioningStatus::Provisioned.as_str().to_string());
        active.provisioning_error = Set(None);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CoreError::SlugUnavailable(slug.to_string())
            } else {
                storage_error("update slug", &e)
            }
        })?;
        Ok(())
    }

    async fn mark_pending(&self, id: i64, requested_slug: &str) -> CoreResult<()> {
        let mut active: company::ActiveModel = self.company_model(id).await?.into();
        active.requested_slug = Set(Some(requested_slug.to_string()));
        active.provisioning_status = Set(ProvisioningStatus::Pending.as_str().to_string());
        active.provisioning_error = Set(None);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.db)
            .await
            .map_err(|e| storage_error("update provisioning status", &e))?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: i64,
        requested_slug: Option<&str>,
        error: &str,
    ) -> CoreResult<()> {
        let mut active: company::ActiveModel = self.company_model(id).await?.into();
        active.requested_slug = Set(requested_slug.map(ToString::to_string));
        active.provisioning_status = Set(ProvisioningStatus::Failed.as_str().to_string());
        active.provisioning_error = Set(Some(error.to_string()));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.db)
            .await
            .map_err(|e| storage_error("update provisioning status", &e))?;
        Ok(())
    }
}
