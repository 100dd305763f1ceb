// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 是否为 http/https 链接
pub fn is_http(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// 去除查询参数、片段和末尾的 `/ref=...` 跟踪段，得到规范化URL
pub fn canonicalize(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    if let Some((head, last)) = url.path().rsplit_once('/') {
        if last.starts_with("ref=") && !head.is_empty() {
            clean.set_path(head);
        }
    }
    clean.to_string()
}

/// 将 `page` 查询参数加一（缺省视为第 1 页），保留其他参数
pub fn increment_page_param(url: &Url) -> Url {
    let mut current_page: u32 = 1;
    let mut pairs: Vec<(String, String)> = Vec::new();

    for (key, value) in url.query_pairs() {
        if key == "page" {
            current_page = value.parse().unwrap_or(1);
        } else {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }

    let mut next = url.clone();
    next.set_fragment(None);
    {
        let mut query = next.query_pairs_mut();
        query.clear();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        query.append_pair("page", &(current_page.saturating_add(1)).to_string());
    }
    next
}
