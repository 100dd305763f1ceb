// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::domain::models::product::ProductRef;
use crate::utils::url_utils::{canonicalize, is_http, resolve_url};

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Invalid anchor selector"));

/// 商品路径模式，先匹配 `/dp/<id>`，再匹配旧版 `/gp/product/<id>`
static PRODUCT_PATH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"/dp/([A-Za-z0-9]+)").expect("Invalid dp regex"),
        Regex::new(r"/gp/product/([A-Za-z0-9]+)").expect("Invalid gp/product regex"),
    ]
});

static ASIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{10}$").expect("Invalid ASIN regex"));

/// 列表页商品链接提取器
pub struct ListingExtractor;

impl ListingExtractor {
    /// 从列表页中提取商品引用
    ///
    /// # 参数
    ///
    /// * `html_content` - 列表页HTML
    /// * `page_url` - 列表页URL，用于解析相对链接
    ///
    /// # 返回值
    ///
    /// * `Ok(HashSet<ProductRef>)` - 规范化后的商品引用，可能为空
    /// * `Err(anyhow::Error)` - 页面URL无法解析
    pub fn extract_listing_urls(html_content: &str, page_url: &str) -> Result<HashSet<ProductRef>> {
        let document = Html::parse_document(html_content);
        let base = Url::parse(page_url)?;
        Ok(Self::extract_from_document(&document, &base))
    }

    /// 从已解析的文档中提取商品引用
    pub fn extract_from_document(document: &Html, base: &Url) -> HashSet<ProductRef> {
        Self::ordered_refs(document, base).into_iter().collect()
    }

    /// 按文档顺序提取商品引用（已去重）
    pub fn ordered_refs(document: &Html, base: &Url) -> Vec<ProductRef> {
        let mut seen = HashSet::new();
        let mut refs = Vec::new();

        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Some(product) = Self::to_product_ref(base, href.trim()) {
                if seen.insert(product.dedup_key().to_string()) {
                    refs.push(product);
                }
            }
        }

        refs
    }

    fn to_product_ref(base: &Url, href: &str) -> Option<ProductRef> {
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }

        let url = resolve_url(base, href).ok()?;
        if !is_http(&url) {
            return None;
        }

        // Only the path counts; sponsored redirects carry the target in the query
        let path = url.path();
        let id = PRODUCT_PATH_PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(path))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())?;

        let asin = ASIN_REGEX.is_match(&id).then_some(id);
        Some(ProductRef::new(canonicalize(&url), asin))
    }
}
