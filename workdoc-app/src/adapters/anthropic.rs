//! `LanguageModel` implementation over the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use workdoc_core::error::{CoreError, CoreResult};
use workdoc_core::traits::LanguageModel;
use workdoc_core::types::CompletionRequest;

/// Default API base URL.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
/// Default model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// 长文档生成耗时较长
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const ERROR_BODY_LIMIT: usize = 512;

// ===== Wire types =====

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

// ===== Client =====

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: Option<u32>,
}

impl AnthropicClient {
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build Anthropic HTTP client, using defaults: {e}");
                Client::new()
            });

        Self {
            client,
            api_key,
            api_url: ANTHROPIC_API_URL.to_string(),
            model,
            max_tokens: None,
        }
    }

    /// Override the API base URL (tests, proxies).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Upper bound applied to every request's `max_tokens`.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> MessagesRequest<'a> {
        let mut content = Vec::with_capacity(2);
        if let Some(image) = &request.image {
            content.push(ContentBlock::Image {
                source: ImageSource {
                    source_type: "base64",
                    media_type: &image.media_type,
                    data: base64::engine::general_purpose::STANDARD.encode(&image.data),
                },
            });
        }
        content.push(ContentBlock::Text {
            text: &request.prompt,
        });

        let max_tokens = self
            .max_tokens
            .map_or(request.max_tokens, |cap| request.max_tokens.min(cap));

        MessagesRequest {
            model: &self.model,
            max_tokens,
            system: &request.system,
            messages: vec![Message {
                role: "user",
                content,
            }],
        }
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> CoreResult<String> {
        let body = self.build_body(&request);
        log::debug!(
            "[anthropic] POST /messages model={} max_tokens={} image={}",
            body.model,
            body.max_tokens,
            request.image.is_some()
        );

        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::LanguageModel(format!("request failed: {e}")))?;

        match response.status() {
            StatusCode::OK => {
                let parsed = response.json::<MessagesResponse>().await.map_err(|e| {
                    CoreError::LanguageModel(format!("failed to parse response: {e}"))
                })?;
                let text: String = parsed
                    .content
                    .into_iter()
                    .filter(|block| block.block_type == "text")
                    .filter_map(|block| block.text)
                    .collect();
                log::debug!("[anthropic] Response: {} chars", text.len());
                Ok(text)
            }
            StatusCode::UNAUTHORIZED => Err(CoreError::LanguageModel(
                "unauthorized: check the Anthropic API key".to_string(),
            )),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(CoreError::LanguageModel("rate limited".to_string()))
            }
            status => {
                let mut message = response.text().await.unwrap_or_default();
                if message.len() > ERROR_BODY_LIMIT {
                    let mut end = ERROR_BODY_LIMIT;
                    while !message.is_char_boundary(end) {
                        end -= 1;
                    }
                    message.truncate(end);
                }
                Err(CoreError::LanguageModel(format!(
                    "API error {}: {message}",
                    status.as_u16()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdoc_core::types::ImageInput;

    fn request(image: Option<ImageInput>) -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            prompt: "prompt".to_string(),
            image,
            max_tokens: 4096,
        }
    }

    #[test]
    fn body_puts_image_before_text() {
        let client = AnthropicClient::new("key".to_string(), DEFAULT_MODEL.to_string());
        let request = request(Some(ImageInput {
            media_type: "image/png".to_string(),
            data: b"abc".to_vec(),
        }));

        let body = serde_json::to_value(client.build_body(&request)).unwrap();

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["system"], "system");
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["type"], "base64");
        assert_eq!(content[0]["source"]["media_type"], "image/png");
        assert_eq!(content[0]["source"]["data"], "YWJj");
        assert_eq!(content[1]["type"], "text");
        assert_eq!(content[1]["text"], "prompt");
    }

    #[test]
    fn max_tokens_is_capped() {
        let client =
            AnthropicClient::new("key".to_string(), "m".to_string()).with_max_tokens(1000);
        assert_eq!(client.build_body(&request(None)).max_tokens, 1000);

        let uncapped = AnthropicClient::new("key".to_string(), "m".to_string());
        assert_eq!(uncapped.build_body(&request(None)).max_tokens, 4096);
    }
}
