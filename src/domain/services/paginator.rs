// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::utils::url_utils::{increment_page_param, is_http, resolve_url};

static NEXT_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.s-pagination-next").expect("Invalid selector"));
static LAST_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.a-last").expect("Invalid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("Invalid selector"));
static NEXT_BUTTON: Lazy<Selector> =
    Lazy::new(|| Selector::parse("button.s-pagination-next").expect("Invalid selector"));
static LABELLED_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[aria-label][href]").expect("Invalid selector"));

/// 翻页策略
///
/// 按固定顺序尝试，第一个给出可用URL的策略生效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// 桌面版 `a.s-pagination-next`
    NextAnchor,
    /// 移动端/旧版 `li.a-last a`
    LastItem,
    /// `button.s-pagination-next`，通过递增 `page` 参数构造下一页
    NextButton,
    /// 无障碍标签为 "Next" 的链接
    AriaLabel,
}

impl PaginationStrategy {
    pub const ORDER: [PaginationStrategy; 4] = [
        PaginationStrategy::NextAnchor,
        PaginationStrategy::LastItem,
        PaginationStrategy::NextButton,
        PaginationStrategy::AriaLabel,
    ];

    fn candidate(&self, document: &Html, current: &Url) -> Option<Url> {
        match self {
            PaginationStrategy::NextAnchor => document
                .select(&NEXT_ANCHOR)
                .find(|el| !is_disabled(el))
                .and_then(|el| href_of(&el, current)),
            PaginationStrategy::LastItem => document
                .select(&LAST_ITEM)
                .filter(|li| !has_class(li, "a-disabled"))
                .find_map(|li| li.select(&ANCHOR).next())
                .and_then(|el| href_of(&el, current)),
            PaginationStrategy::NextButton => document
                .select(&NEXT_BUTTON)
                .find(|el| !is_disabled(el) && el.value().attr("disabled").is_none())
                .map(|_| increment_page_param(current)),
            PaginationStrategy::AriaLabel => document
                .select(&LABELLED_ANCHOR)
                .find(|el| {
                    el.value().attr("aria-label").is_some_and(|label| {
                        let label = label.trim().to_lowercase();
                        label == "next" || label.starts_with("go to next page")
                    })
                })
                .and_then(|el| href_of(&el, current)),
        }
    }
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn is_disabled(element: &ElementRef<'_>) -> bool {
    has_class(element, "s-pagination-disabled")
        || element
            .value()
            .attr("aria-disabled")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn href_of(element: &ElementRef<'_>, current: &Url) -> Option<Url> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    resolve_url(current, href).ok()
}

/// 分页器
pub struct Paginator;

impl Paginator {
    /// 计算下一页URL
    ///
    /// # 参数
    ///
    /// * `html_content` - 当前列表页HTML
    /// * `current_url` - 当前页URL
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Url))` - 下一页URL
    /// * `Ok(None)` - 没有下一页
    /// * `Err(anyhow::Error)` - 当前URL无法解析
    pub fn next_page(html_content: &str, current_url: &str) -> Result<Option<Url>> {
        let document = Html::parse_document(html_content);
        let current = Url::parse(current_url)?;
        Ok(Self::next_from_document(&document, &current))
    }

    /// 在已解析的文档上计算下一页URL
    pub fn next_from_document(document: &Html, current: &Url) -> Option<Url> {
        PaginationStrategy::ORDER.iter().find_map(|strategy| {
            let next = strategy
                .candidate(document, current)
                .filter(|url| is_http(url) && url != current)?;
            debug!(strategy = ?strategy, next = %next, "Pagination strategy matched");
            Some(next)
        })
    }
}
