// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::errors::{BlockError, FetchError};

/// 页面抓取结果
///
/// 由抓取器生成，交给拦截检测器分类后即被消费
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// 跟随重定向后的最终URL
    pub final_url: String,
    /// HTTP状态码（请求未完成时为空）
    pub status_code: Option<u16>,
    /// 响应内容
    pub body: String,
    /// 响应体是否因超出大小限制而被截断
    pub truncated: bool,
    /// 抓取错误
    pub error: Option<FetchError>,
}

impl FetchResult {
    /// 构建成功的抓取结果
    pub fn success(final_url: impl Into<String>, status_code: u16, body: impl Into<String>) -> Self {
        Self {
            final_url: final_url.into(),
            status_code: Some(status_code),
            body: body.into(),
            truncated: false,
            error: None,
        }
    }

    /// 构建失败的抓取结果
    pub fn failure(final_url: impl Into<String>, error: FetchError) -> Self {
        Self {
            final_url: final_url.into(),
            status_code: None,
            body: String::new(),
            truncated: false,
            error: Some(error),
        }
    }

    /// 状态码是否为 2xx
    pub fn is_success_status(&self) -> bool {
        self.status_code.is_some_and(|s| (200..300).contains(&s))
    }
}

/// 页面分类
///
/// 由 `FetchResult` 确定性地推导得出，推导后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageClassification {
    /// 正常页面
    Normal,
    /// 验证码挑战页
    Captcha,
    /// 机器人检查等中间页
    Interstitial,
    /// 抓取失败
    FetchFailed,
}

impl PageClassification {
    pub fn is_normal(&self) -> bool {
        matches!(self, PageClassification::Normal)
    }

    /// 对应的拦截错误（仅验证码和中间页）
    pub fn block_error(&self) -> Option<BlockError> {
        match self {
            PageClassification::Captcha => Some(BlockError::Captcha),
            PageClassification::Interstitial => Some(BlockError::Interstitial),
            _ => None,
        }
    }
}

impl fmt::Display for PageClassification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PageClassification::Normal => write!(f, "normal"),
            PageClassification::Captcha => write!(f, "captcha"),
            PageClassification::Interstitial => write!(f, "interstitial"),
            PageClassification::FetchFailed => write!(f, "fetch_failed"),
        }
    }
}
