// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::models::product::ProductRecord;

/// 类目商品URL抓取响应
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUrlsResponseDto {
    pub product_urls: Vec<String>,
}

/// 商品详情抓取响应
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailsResponseDto {
    pub product_details: Vec<ProductRecord>,
}
