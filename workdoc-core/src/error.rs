//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use workdoc_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Company not found
    #[error("Company not found: {0}")]
    CompanyNotFound(i64),

    /// Slug is held by another company (unique constraint lost)
    #[error("Slug unavailable: {0}")]
    SlugUnavailable(String),

    /// Slug does not satisfy the subdomain label rules
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// No DNS provider configured
    #[error("DNS provider is not configured")]
    DnsProviderUnavailable,

    /// No language model configured
    #[error("Language model is not configured")]
    LanguageModelUnavailable,

    /// Language model call failed
    #[error("Language model error: {0}")]
    LanguageModel(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, missing resource), used
    /// to pick the log level.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::CompanyNotFound(_)
            | Self::SlugUnavailable(_)
            | Self::InvalidSlug(_)
            | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
