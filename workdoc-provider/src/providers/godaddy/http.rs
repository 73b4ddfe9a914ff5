//! GoDaddy HTTP 请求方法

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{GodaddyErrorBody, GodaddyProvider};

impl GodaddyProvider {
    /// 发送请求，2xx 时返回响应体文本
    ///
    /// 非 2xx 响应按错误体中的 `code` 映射，缺少 `code` 时使用 HTTP 状态码。
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        context: ErrorContext,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json");
        if let Some(body) = &body {
            log::debug!("Request Body: {body}");
            request = request.json(body);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            method.as_str(),
            &url,
            self.retry,
        )
        .await?;

        if (200..300).contains(&status) {
            return Ok(response_text);
        }

        let error_body = serde_json::from_str::<GodaddyErrorBody>(&response_text).ok();
        let (code, message) = error_body.map_or((None, None), |b| (b.code, b.message));
        let raw = RawApiError::with_code(
            code.unwrap_or_else(|| status.to_string()),
            message.unwrap_or_else(|| format!("HTTP {status}")),
        );
        log::error!("[{}] API error: {}", self.provider_name(), raw.message);
        Err(self.map_error(raw, context))
    }

    /// 执行 GET 请求并解析 JSON
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let response_text = self.send(Method::GET, path, None, context).await?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// 执行 PATCH 请求（追加记录，响应体为空）
    pub(crate) async fn patch(&self, path: &str, body: Value, context: ErrorContext) -> Result<()> {
        self.send(Method::PATCH, path, Some(body), context)
            .await
            .map(|_| ())
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        self.send(Method::DELETE, path, None, context)
            .await
            .map(|_| ())
    }
}
