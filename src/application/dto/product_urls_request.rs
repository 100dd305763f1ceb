// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::dto::{ensure_http_urls, invalid_input};
use crate::utils::errors::CrawlError;

/// 默认返回的商品URL数量
pub const DEFAULT_URL_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_URL_LIMIT
}

/// 类目商品URL抓取请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUrlsRequestDto {
    /// 类目起始URL列表
    #[validate(length(min = 1))]
    pub category_urls: Vec<String>,
    /// 商品URL数量上限
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub limit: usize,
}

impl ProductUrlsRequestDto {
    /// 校验请求，返回去除首尾空白后的类目URL
    pub fn validated(self) -> Result<(Vec<String>, usize), CrawlError> {
        self.validate().map_err(invalid_input)?;
        let urls: Vec<String> = self
            .category_urls
            .iter()
            .map(|u| u.trim().to_string())
            .collect();
        ensure_http_urls("categoryUrls", &urls)?;
        Ok((urls, self.limit))
    }
}
