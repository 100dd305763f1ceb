// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::dto::{ensure_http_urls, invalid_input};
use crate::utils::errors::CrawlError;

/// 商品详情抓取请求
///
/// 批量大小上限不在这里校验：超限请求返回一条错误记录而不是错误响应
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailsRequestDto {
    /// 商品URL列表
    #[validate(length(min = 1))]
    pub product_urls: Vec<String>,
}

impl ProductDetailsRequestDto {
    pub fn validated(self) -> Result<Vec<String>, CrawlError> {
        self.validate().map_err(invalid_input)?;
        let urls: Vec<String> = self
            .product_urls
            .iter()
            .map(|u| u.trim().to_string())
            .collect();
        ensure_http_urls("productUrls", &urls)?;
        Ok(urls)
    }
}
