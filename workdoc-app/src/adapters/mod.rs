//! Storage and language model adapters.

mod anthropic;

pub use anthropic::{AnthropicClient, ANTHROPIC_API_URL, DEFAULT_MODEL};

#[cfg(feature = "sqlite-store")]
mod sqlite;

#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;
