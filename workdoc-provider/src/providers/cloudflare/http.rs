//! Cloudflare HTTP 请求方法

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareResponse, MAX_PAGE_SIZE_RECORDS};

impl CloudflareProvider {
    /// 发送请求并解析 Cloudflare 响应信封
    ///
    /// `success: false` 时按第一条错误的 code 映射为统一错误。
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_token);
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

        let cf_response: CloudflareResponse<T> = match serde_json::from_str(&response_text) {
            Ok(response) => response,
            // 网关层返回的非 JSON 401/403
            Err(_) if matches!(status, 401 | 403) => {
                return Err(self.map_error(
                    RawApiError::with_code(status.to_string(), format!("HTTP {status}")),
                    context,
                ));
            }
            Err(_) => HttpUtils::parse_json(&response_text, self.provider_name())?,
        };

        if !cf_response.success {
            let raw = cf_response.errors.first().map_or_else(
                || RawApiError::with_code(status.to_string(), "Unknown error"),
                |e| RawApiError::with_code(e.code.to_string(), e.message.clone()),
            );
            log::error!("[{}] API error: {}", self.provider_name(), raw.message);
            return Err(self.map_error(raw, context));
        }

        Ok(cf_response)
    }

    /// 执行 GET 请求，返回 result 字段
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        self.send(Method::GET, path, None, context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("response is missing the result field"))
    }

    /// 执行 POST 请求，返回 result 字段
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        context: ErrorContext,
    ) -> Result<T> {
        self.send(Method::POST, path, Some(body), context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("response is missing the result field"))
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        self.send::<Value>(Method::DELETE, path, None, context)
            .await
            .map(|_| ())
    }

    /// 拉取一页 DNS 记录，返回 (记录, 总页数)
    ///
    /// `name` 为完整域名时按名称精确过滤。
    pub(crate) async fn get_records_page(
        &self,
        page: u32,
        name: Option<&str>,
    ) -> Result<(Vec<CloudflareDnsRecord>, u32)> {
        let mut path = format!(
            "/zones/{}/dns_records?type={}&page={}&per_page={}",
            self.zone_id,
            self.target.record_type.as_str(),
            page,
            MAX_PAGE_SIZE_RECORDS
        );
        if let Some(name) = name {
            path.push_str("&name=");
            path.push_str(&urlencoding::encode(name));
        }

        let context = ErrorContext::zone(&self.zone_id);
        let response = self
            .send::<Vec<CloudflareDnsRecord>>(Method::GET, &path, None, context)
            .await?;

        let total_pages = response.result_info.map_or(1, |i| i.total_pages.max(i.page));
        Ok((response.result.unwrap_or_default(), total_pages))
    }
}
