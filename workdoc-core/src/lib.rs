//! WorkDoc360 Core Library
//!
//! Platform-independent business logic for the WorkDoc360 back end:
//! - Subdomain pool manager (claim, rename, expand, operator retry queue)
//! - Company registration
//! - CSCS card analysis
//! - Compliance document generation
//!
//! Storage and the language model are abstracted behind traits; the
//! `workdoc-app` crate supplies the SQLite and Anthropic implementations.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{PoolSettings, ServiceContext};
pub use traits::{CandidateRepository, CompanyRepository, DocumentRepository, LanguageModel};
