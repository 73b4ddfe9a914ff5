//! `DocumentRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use workdoc_core::error::{CoreError, CoreResult};
use workdoc_core::traits::DocumentRepository;
use workdoc_core::types::{DocumentType, GeneratedDocument};

use super::entity::generated_document;
use super::{parse_timestamp, storage_error, SqliteStore};

impl generated_document::Model {
    fn into_document(self) -> CoreResult<GeneratedDocument> {
        let document_type = self
            .document_type
            .parse::<DocumentType>()
            .map_err(CoreError::SerializationError)?;

        Ok(GeneratedDocument {
            id: self.id,
            company_id: self.company_id,
            document_type,
            title: self.title,
            content: self.content,
            content_hash: self.content_hash,
            model: self.model,
            created_at: parse_timestamp("created_at", &self.created_at)?,
        })
    }
}

#[async_trait]
impl DocumentRepository for SqliteStore {
    async fn insert(&self, document: &GeneratedDocument) -> CoreResult<()> {
        let active_model = generated_document::ActiveModel {
            id: Set(document.id.clone()),
            company_id: Set(document.company_id),
            document_type: Set(document.document_type.as_str().to_string()),
            title: Set(document.title.clone()),
            content: Set(document.content.clone()),
            content_hash: Set(document.content_hash.clone()),
            model: Set(document.model.clone()),
            created_at: Set(document.created_at.to_rfc3339()),
        };

        generated_document::Entity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| storage_error("insert document", &e))?;
        Ok(())
    }

    async fn find_by_company(&self, company_id: i64) -> CoreResult<Vec<GeneratedDocument>> {
        let rows = generated_document::Entity::find()
            .filter(generated_document::Column::CompanyId.eq(company_id))
            .order_by_desc(generated_document::Column::CreatedAt)
            .order_by_desc(generated_document::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error("query documents", &e))?;

        rows.into_iter()
            .map(generated_document::Model::into_document)
            .collect()
    }
}
