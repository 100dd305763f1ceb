// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domain::models::page::PageClassification;
use crate::domain::models::product::ProductRef;

/// 类目爬取阶段
///
/// 状态转换遵循以下流程：
/// FetchingPage → Classifying → ExtractingListing → Paginating → FetchingPage ...
/// 任意阶段都可能进入 Terminated，且只会进入一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrawlPhase {
    /// 抓取页面
    #[default]
    FetchingPage,
    /// 页面分类
    Classifying,
    /// 提取列表商品
    ExtractingListing,
    /// 翻页
    Paginating,
    /// 已终止
    Terminated,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrawlPhase::FetchingPage => write!(f, "fetching_page"),
            CrawlPhase::Classifying => write!(f, "classifying"),
            CrawlPhase::ExtractingListing => write!(f, "extracting_listing"),
            CrawlPhase::Paginating => write!(f, "paginating"),
            CrawlPhase::Terminated => write!(f, "terminated"),
        }
    }
}

/// 终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "classification")]
pub enum TerminationReason {
    /// 没有下一页
    Exhausted,
    /// 页面被拦截或抓取失败
    Blocked(PageClassification),
    /// 达到每个类目的最大页数
    PageLimit,
    /// 达到调用方指定的商品数量上限
    ProductLimit,
    /// 下一页已访问过
    PaginationCycle,
    /// 任务被取消
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "exhausted"),
            TerminationReason::Blocked(c) => write!(f, "blocked ({})", c),
            TerminationReason::PageLimit => write!(f, "page_limit"),
            TerminationReason::ProductLimit => write!(f, "product_limit"),
            TerminationReason::PaginationCycle => write!(f, "pagination_cycle"),
            TerminationReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// 单个类目任务的爬取状态
///
/// 由处理该任务的编排器独占，不在任务间共享。
/// `seen_urls` 只增不减，`page_count` 在终止前严格递增。
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// 当前页面URL
    pub current_page_url: String,
    /// 已发现商品的去重键
    seen_urls: HashSet<String>,
    /// 按发现顺序保存的商品引用
    products: Vec<ProductRef>,
    /// 已访问的列表页
    visited_pages: HashSet<String>,
    /// 已抓取的页数
    page_count: u32,
    /// 当前阶段
    phase: CrawlPhase,
    /// 终止原因
    termination: Option<TerminationReason>,
}

impl CrawlState {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            current_page_url: start_url.into(),
            seen_urls: HashSet::new(),
            products: Vec::new(),
            visited_pages: HashSet::new(),
            page_count: 0,
            phase: CrawlPhase::FetchingPage,
            termination: None,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn seen_count(&self) -> usize {
        self.products.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn has_visited(&self, page_url: &str) -> bool {
        self.visited_pages.contains(page_url)
    }

    /// 进入新阶段；终止后忽略
    pub fn enter(&mut self, phase: CrawlPhase) {
        if !self.is_terminated() {
            self.phase = phase;
        }
    }

    /// 记录一次页面抓取
    pub fn begin_page(&mut self) {
        if self.is_terminated() {
            return;
        }
        self.page_count += 1;
        self.visited_pages.insert(self.current_page_url.clone());
        self.phase = CrawlPhase::FetchingPage;
    }

    /// 合并当前页提取到的商品，返回新增数量
    pub fn absorb<I>(&mut self, refs: I) -> usize
    where
        I: IntoIterator<Item = ProductRef>,
    {
        let mut added = 0;
        for product in refs {
            if self.seen_urls.insert(product.dedup_key().to_string()) {
                self.products.push(product);
                added += 1;
            }
        }
        added
    }

    /// 前往下一页
    pub fn advance(&mut self, next_url: impl Into<String>) {
        if self.is_terminated() {
            return;
        }
        self.current_page_url = next_url.into();
        self.phase = CrawlPhase::FetchingPage;
    }

    /// 终止任务；只有第一次调用生效，返回是否生效
    pub fn terminate(&mut self, reason: TerminationReason) -> bool {
        if self.is_terminated() {
            return false;
        }
        self.termination = Some(reason);
        self.phase = CrawlPhase::Terminated;
        true
    }

    /// 消费状态并生成类目报告，商品按发现顺序截断到 `limit`
    pub fn into_report(self, category_url: impl Into<String>, limit: Option<usize>) -> CategoryReport {
        let mut products = self.products;
        if let Some(limit) = limit {
            products.truncate(limit);
        }
        CategoryReport {
            category_url: category_url.into(),
            products,
            pages_visited: self.page_count,
            termination: self.termination.unwrap_or(TerminationReason::Exhausted),
        }
    }
}

/// 类目爬取报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    /// 类目起始URL
    pub category_url: String,
    /// 去重后的商品引用（发现顺序）
    pub products: Vec<ProductRef>,
    /// 抓取的页数
    pub pages_visited: u32,
    /// 终止原因
    pub termination: TerminationReason,
}

impl CategoryReport {
    pub fn product_urls(&self) -> Vec<String> {
        self.products.iter().map(|p| p.url.clone()).collect()
    }
}
