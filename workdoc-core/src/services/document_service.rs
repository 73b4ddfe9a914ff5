//! Compliance document generation

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{Company, CompletionRequest, DocumentRequest, GeneratedDocument};

const DOCUMENT_MAX_TOKENS: u32 = 4096;

const DOCUMENT_SYSTEM_PROMPT: &str = "You are a health and safety consultant for UK \
construction companies. Write complete, practical compliance documents that follow UK \
legislation (CDM 2015, the Health and Safety at Work etc. Act 1974) and use Markdown headings.";

/// 文档生成服务
pub struct DocumentService {
    ctx: Arc<ServiceContext>,
}

impl DocumentService {
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

    /// Generate and store a document for a company.
    pub async fn generate_document(
        &self,
        company_id: i64,
        request: DocumentRequest,
    ) -> CoreResult<GeneratedDocument> {
        let company = self.load_company(company_id).await?;
        let model = self.ctx.language_model()?;

        log::info!(
            "Generating {} for company {company_id} with {}",
            request.document_type,
            model.model_name()
        );
        let content = model
            .complete(CompletionRequest {
                system: DOCUMENT_SYSTEM_PROMPT.to_string(),
                prompt: build_prompt(&company, &request),
                image: None,
                max_tokens: DOCUMENT_MAX_TOKENS,
            })
            .await?;
        if content.trim().is_empty() {
            return Err(CoreError::LanguageModel(
                "model returned an empty document".to_string(),
            ));
        }

        let subject = request
            .project_name
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(&company.name);
        let document = GeneratedDocument {
            id: uuid::Uuid::new_v4().to_string(),
            company_id,
            document_type: request.document_type,
            title: format!("{} - {subject}", request.document_type.title()),
            content_hash: content_hash(&content),
            content,
            model: model.model_name().to_string(),
            created_at: Utc::now(),
        };
        self.ctx.document_repository.insert(&document).await?;

        log::info!("Stored document {} for company {company_id}", document.id);
        Ok(document)
    }

    /// Documents of a company, newest first.
    pub async fn list_documents(&self, company_id: i64) -> CoreResult<Vec<GeneratedDocument>> {
        self.load_company(company_id).await?;
        self.ctx
            .document_repository
            .find_by_company(company_id)
            .await
    }
}

/// Hex SHA-256 of the stored content.
#[must_use]
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

fn build_prompt(company: &Company, request: &DocumentRequest) -> String {
    let mut prompt = format!(
        "Write a {} for {}.\n",
        request.document_type.title(),
        company.name
    );

    let details = [
        ("Project", &request.project_name),
        ("Site address", &request.site_address),
        ("Trade", &request.trade),
        ("Additional details", &request.additional_details),
    ];
    for (label, value) in details {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let _ = writeln!(prompt, "{label}: {value}");
        }
    }

    prompt.push_str("\nReturn only the document.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockDnsProvider, MockLanguageModel, TestEnv};
    use crate::traits::DocumentRepository;
    use crate::types::DocumentType;

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            content_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn generates_and_stores_document() {
        let model = Arc::new(MockLanguageModel::replying("# Risk Assessment\n..."));
        let env = TestEnv::with_model(MockDnsProvider::new(), model.clone());
        env.companies.insert_with_id(7, "Smith Scaffolding Ltd").await;
        let service = DocumentService::new(env.ctx.clone());

        let mut request = DocumentRequest::new(DocumentType::RiskAssessment);
        request.project_name = Some("Leeds Office Refit".to_string());
        request.trade = Some("Scaffolding".to_string());

        let document = service.generate_document(7, request).await.unwrap();

        assert_eq!(document.title, "Risk Assessment - Leeds Office Refit");
        assert_eq!(document.content, "# Risk Assessment\n...");
        assert_eq!(document.content_hash, content_hash(&document.content));
        assert_eq!(document.model, "mock-model");

        let prompt = &model.requests().await[0].prompt;
        assert!(prompt.contains("Smith Scaffolding Ltd"));
        assert!(prompt.contains("Trade: Scaffolding"));
        assert!(!prompt.contains("Site address"));

        let listed = service.list_documents(7).await.unwrap();
        assert_eq!(listed, vec![document]);
    }

    #[tokio::test]
    async fn title_falls_back_to_company_name() {
        let model = Arc::new(MockLanguageModel::replying("manual"));
        let env = TestEnv::with_model(MockDnsProvider::new(), model);
        env.companies.insert_with_id(1, "Acme").await;
        let service = DocumentService::new(env.ctx.clone());

        let document = service
            .generate_document(1, DocumentRequest::new(DocumentType::Iso9001Template))
            .await
            .unwrap();

        assert_eq!(document.title, "ISO 9001 Quality Manual - Acme");
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let env = TestEnv::with_model(
            MockDnsProvider::new(),
            Arc::new(MockLanguageModel::replying("  \n")),
        );
        env.companies.insert_with_id(1, "Acme").await;
        let service = DocumentService::new(env.ctx.clone());

        let err = service
            .generate_document(1, DocumentRequest::new(DocumentType::MethodStatement))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::LanguageModel(_)));
        assert!(env.documents.find_by_company(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_company_is_not_found() {
        let env = TestEnv::with_model(
            MockDnsProvider::new(),
            Arc::new(MockLanguageModel::replying("doc")),
        );
        let service = DocumentService::new(env.ctx.clone());

        let err = service.list_documents(3).await.unwrap_err();

        assert!(matches!(err, CoreError::CompanyNotFound(3)));
    }
}
