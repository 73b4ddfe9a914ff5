//! 抽象层 Trait 定义
//!
//! 平台层（`workdoc-app`）提供具体实现：存储使用 `SeaORM` + SQLite，
//! 语言模型使用 Anthropic Messages API。

mod candidate_repository;
mod company_repository;
mod document_repository;
mod language_model;

pub use candidate_repository::CandidateRepository;
pub use company_repository::CompanyRepository;
pub use document_repository::DocumentRepository;
pub use language_model::LanguageModel;
