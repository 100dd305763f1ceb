// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// 缺失字段的占位值
pub const NOT_AVAILABLE: &str = "N/A";

/// 商品引用
///
/// 去重键为 ASIN（存在时），否则为规范化URL；同一商品的不同路径写法视为同一引用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    /// 规范化后的商品URL（已去除查询参数和片段）
    pub url: String,
    /// 商品 ASIN（可选）
    pub asin: Option<String>,
}

impl ProductRef {
    pub fn new(url: impl Into<String>, asin: Option<String>) -> Self {
        Self {
            url: url.into(),
            asin,
        }
    }

    /// 去重键
    pub fn dedup_key(&self) -> &str {
        self.asin.as_deref().unwrap_or(&self.url)
    }
}

impl PartialEq for ProductRef {
    fn eq(&self, other: &Self) -> bool {
        self.dedup_key() == other.dedup_key()
    }
}

impl Eq for ProductRef {}

impl Hash for ProductRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dedup_key().hash(state);
    }
}

/// 商品详情记录
///
/// 每个请求的商品URL都对应且仅对应一条记录；失败通过 `error` 字段表达而不是省略记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// 商品URL（批量超限时为空）
    pub url: Option<String>,
    /// 商品名称
    pub product_name: String,
    /// 价格文本
    pub price: String,
    /// 货币符号
    pub currency: String,
    /// 错误描述
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProductRecord {
    /// 构建成功提取的记录，缺失字段填充为 "N/A"
    pub fn extracted(
        url: impl Into<String>,
        title: Option<String>,
        price: Option<String>,
        currency: Option<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            product_name: or_not_available(title),
            price: or_not_available(price),
            currency: or_not_available(currency),
            error: None,
        }
    }

    /// 构建失败记录，所有字段为 "N/A"
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            product_name: NOT_AVAILABLE.to_string(),
            price: NOT_AVAILABLE.to_string(),
            currency: NOT_AVAILABLE.to_string(),
            error: Some(reason.into()),
        }
    }

    /// 批量超限时返回的唯一错误记录
    pub fn batch_rejected(max: usize) -> Self {
        let message = format!("ERROR: Too many URLs in one request (max {})", max);
        Self {
            url: None,
            product_name: message.clone(),
            price: NOT_AVAILABLE.to_string(),
            currency: NOT_AVAILABLE.to_string(),
            error: Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn or_not_available(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
