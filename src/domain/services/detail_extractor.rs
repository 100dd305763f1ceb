// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::errors::ExtractionGap;

/// 字段取值方式
#[derive(Debug, Clone, Copy)]
enum Source {
    /// 元素文本
    Text,
    /// 元素的 `content` 属性
    Content,
}

/// 标题选择器链，按顺序尝试
const TITLE_CHAIN: &[(&str, Source)] = &[
    ("#productTitle", Source::Text),
    (".product-title-word-break", Source::Text),
    ("h1.a-size-large", Source::Text),
    ("h1", Source::Text),
    (r#"meta[name="title"]"#, Source::Content),
    (r#"meta[property="og:title"]"#, Source::Content),
    ("title", Source::Text),
];

/// 价格选择器链，按顺序尝试
const PRICE_CHAIN: &[&str] = &[
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    "#priceblock_saleprice",
    "#priceblock_pospromoprice",
    "#priceblock_businessprice",
    "#priceblock_snsprice_Based",
    "span.a-price.a-text-price span.a-offscreen",
    "span.a-price span.a-offscreen",
    "span.a-price-whole",
];

static PRICE_TEXT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([$£€₹])\s?([\d,]+\.\d{2})").expect("Invalid price regex"));

static LEADING_SYMBOL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([$£€₹])").expect("Invalid currency regex"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// 详情页提取结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailExtraction {
    /// 商品标题
    pub title: Option<String>,
    /// 价格文本
    pub price: Option<String>,
    /// 货币符号
    pub currency: Option<String>,
}

impl DetailExtraction {
    /// 未能提取到的字段
    pub fn gaps(&self) -> Vec<ExtractionGap> {
        let mut gaps = Vec::new();
        if self.title.is_none() {
            gaps.push(ExtractionGap::TitleNotFound);
        }
        if self.price.is_none() {
            gaps.push(ExtractionGap::PriceNotFound);
        }
        gaps
    }
}

/// 详情页提取器
pub struct DetailExtractor;

impl DetailExtractor {
    /// 从商品详情页提取标题、价格和货币
    ///
    /// # 参数
    ///
    /// * `html_content` - 详情页HTML
    /// * `source_url` - 详情页URL，用于推断货币
    ///
    /// # 返回值
    ///
    /// 提取结果；缺失的字段为 `None`
    pub fn extract_detail(html_content: &str, source_url: &str) -> DetailExtraction {
        let document = Html::parse_document(html_content);

        let title = Self::extract_title(&document);
        let price = Self::extract_price(&document);
        let currency = price
            .as_deref()
            .and_then(leading_symbol)
            .or_else(|| infer_currency_from_url(source_url));

        DetailExtraction {
            title,
            price,
            currency,
        }
    }

    fn extract_title(document: &Html) -> Option<String> {
        TITLE_CHAIN.iter().find_map(|(css, source)| {
            let selector = Selector::parse(css).ok()?;
            document.select(&selector).find_map(|element| {
                let value = match source {
                    Source::Text => collapse_whitespace(&element.text().collect::<String>()),
                    Source::Content => {
                        collapse_whitespace(element.value().attr("content").unwrap_or_default())
                    }
                };
                (!value.is_empty()).then_some(value)
            })
        })
    }

    fn extract_price(document: &Html) -> Option<String> {
        PRICE_CHAIN
            .iter()
            .find_map(|css| {
                let selector = Selector::parse(css).ok()?;
                document
                    .select(&selector)
                    .map(|element| collapse_whitespace(&element.text().collect::<String>()))
                    .find(|value| !value.is_empty())
            })
            .or_else(|| {
                let text = visible_text(document.root_element());
                PRICE_TEXT_REGEX
                    .find(&text)
                    .map(|m| m.as_str().to_string())
            })
    }
}

/// 收集可见文本（跳过 script/style/noscript）
fn visible_text(root: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in root.descendants() {
        if let Node::Text(t) = node.value() {
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"))
            });
            if !hidden {
                text.push_str(t);
                text.push(' ');
            }
        }
    }
    text
}

fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_REGEX.replace_all(value.trim(), " ").into_owned()
}

fn leading_symbol(price: &str) -> Option<String> {
    LEADING_SYMBOL_REGEX
        .captures(price)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 根据域名后缀推断货币符号
pub fn infer_currency_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let tld = host.rsplit('.').next()?;
    let symbol = match tld {
        "com" | "ca" | "mx" | "au" => "$",
        "in" => "₹",
        "co" | "uk" => "£",
        "de" | "fr" | "es" | "it" => "€",
        "jp" => "¥",
        _ => return None,
    };
    Some(symbol.to_string())
}

#[cfg(test)]
#[path = "detail_extractor_test.rs"]
mod tests;
