// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::identity::ClientIdentity;
use crate::domain::models::page::FetchResult;
use crate::engines::traits::{FetchRequest, PageFetcher};
use crate::utils::errors::FetchError;
use crate::utils::text_encoding::decode_body;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use std::time::Instant;
use tracing::debug;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP抓取引擎，按块读取响应体并强制执行大小上限
pub struct ReqwestEngine;

impl ReqwestEngine {
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers
    }

    fn build_client(
        identity: &ClientIdentity,
        request: &FetchRequest<'_>,
    ) -> Result<reqwest::Client, FetchError> {
        // Built per fetch; cookies never carry over between requests
        let mut builder = reqwest::Client::builder()
            .user_agent(identity.user_agent.as_str())
            .default_headers(Self::default_headers())
            .timeout(request.timeout)
            .cookie_store(true);

        if let Some(proxy_url) = &identity.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| FetchError::NetworkFailure(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))
    }

    async fn fetch_body(client: reqwest::Client, url: &str, max_bytes: usize) -> FetchResult {
        let mut response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::failure(url, map_reqwest_error(e)),
        };

        let final_url = response.url().to_string();
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if response
            .content_length()
            .is_some_and(|len| len > max_bytes as u64)
        {
            return FetchResult {
                final_url,
                status_code: Some(status_code),
                body: String::new(),
                truncated: true,
                error: Some(FetchError::OversizedResponse),
            };
        }

        let mut buffer: Vec<u8> = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if buffer.len() + chunk.len() > max_bytes {
                        let remaining = max_bytes - buffer.len();
                        buffer.extend_from_slice(&chunk[..remaining]);
                        return FetchResult {
                            final_url,
                            status_code: Some(status_code),
                            body: decode_body(&buffer, content_type.as_deref()),
                            truncated: true,
                            error: Some(FetchError::OversizedResponse),
                        };
                    }
                    buffer.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    return FetchResult {
                        final_url,
                        status_code: Some(status_code),
                        body: decode_body(&buffer, content_type.as_deref()),
                        truncated: false,
                        error: Some(map_reqwest_error(e)),
                    };
                }
            }
        }

        FetchResult::success(
            final_url,
            status_code,
            decode_body(&buffer, content_type.as_deref()),
        )
    }
}

fn map_reqwest_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkFailure(error.to_string())
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// 抓取结果；超时、网络失败与超大响应都记录在 `error` 字段中
    async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult {
        let client = match Self::build_client(request.identity, &request) {
            Ok(client) => client,
            Err(e) => return FetchResult::failure(request.url, e),
        };

        let start = Instant::now();
        let result = match tokio::time::timeout(
            request.timeout,
            Self::fetch_body(client, request.url, request.max_bytes),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => FetchResult::failure(request.url, FetchError::Timeout),
        };

        debug!(
            url = %request.url,
            status = ?result.status_code,
            bytes = result.body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            error = ?result.error,
            "Fetch finished"
        );

        result
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
