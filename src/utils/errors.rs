// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 页面抓取错误类型
///
/// 抓取器从不向调用方抛出错误，所有失败都记录在 `FetchResult.error` 中
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchError {
    /// 超过请求的挂钟超时时间
    #[error("Request timed out")]
    Timeout,

    /// 网络层失败（连接、TLS、代理、读取中断等）
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// 响应体超过最大字节数限制
    #[error("Response exceeded the maximum allowed size")]
    OversizedResponse,
}

/// 拦截页面错误类型
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockError {
    #[error("CAPTCHA detected")]
    Captcha,

    #[error("Blocked/interstitial page")]
    Interstitial,
}

/// 字段提取缺口
///
/// 非致命错误，对应字段降级为 "N/A"
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionGap {
    #[error("No title found")]
    TitleNotFound,

    #[error("No price found")]
    PriceNotFound,
}

/// 爬取编排错误类型
///
/// 只有批量超限和输入校验失败会作为错误返回给调用方
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    #[error("Too many URLs in one request: {requested} (max {max})")]
    BatchSizeExceeded { requested: usize, max: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
