//! Language model request types

/// An image attached to a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// MIME type, e.g. `image/jpeg`.
    pub media_type: String,
    /// Raw image bytes.
    pub data: Vec<u8>,
}

/// One completion call: a system prompt, a user prompt and an optional image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub image: Option<ImageInput>,
    pub max_tokens: u32,
}
