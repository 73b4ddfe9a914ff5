//! Language model abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::CompletionRequest;

/// A chat-completion capable model.
///
/// Failures surface as [`CoreError::LanguageModel`](crate::CoreError::LanguageModel).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier recorded on generated documents.
    fn model_name(&self) -> &str;

    /// Run one completion and return the concatenated response text.
    async fn complete(&self, request: CompletionRequest) -> CoreResult<String>;
}
