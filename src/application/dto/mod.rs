// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义应用程序层的数据传输对象
/// 用于在API请求和领域模型之间传输数据
pub mod product_details_request;
pub mod product_response;
pub mod product_urls_request;

use url::Url;
use validator::ValidationErrors;

use crate::utils::errors::CrawlError;

/// 校验URL列表，只接受 http/https 绝对地址
pub(crate) fn ensure_http_urls(field: &str, urls: &[String]) -> Result<(), CrawlError> {
    for raw in urls {
        let valid = Url::parse(raw.trim())
            .map(|u| (u.scheme() == "http" || u.scheme() == "https") && u.host_str().is_some())
            .unwrap_or(false);
        if !valid {
            return Err(CrawlError::InvalidInput(format!(
                "{} contains an invalid URL: {}",
                field, raw
            )));
        }
    }
    Ok(())
}

/// 将校验错误转换为输入错误
pub(crate) fn invalid_input(errors: ValidationErrors) -> CrawlError {
    CrawlError::InvalidInput(errors.to_string())
}
