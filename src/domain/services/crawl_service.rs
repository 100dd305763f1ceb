// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::config::settings::ScraperSettings;
use crate::domain::models::crawl::{CategoryReport, CrawlPhase, CrawlState, TerminationReason};
use crate::domain::models::identity::ClientIdentity;
use crate::domain::models::page::{FetchResult, PageClassification};
use crate::domain::models::product::{ProductRecord, ProductRef};
use crate::domain::services::block_detector::BlockDetector;
use crate::domain::services::detail_extractor::DetailExtractor;
use crate::domain::services::diagnostics::{
    DiagnosticEvent, DiagnosticsCollector, FailureKind, NoopDiagnostics,
};
use crate::domain::services::listing_extractor::ListingExtractor;
use crate::domain::services::paginator::Paginator;
use crate::engines::identity::IdentityRotator;
use crate::engines::throttle::{DelayPolicy, NoDelay, RandomDelay};
use crate::engines::traits::{FetchRequest, PageFetcher};
use crate::utils::errors::CrawlError;

const CANCELLED: &str = "Cancelled";

/// 爬取选项
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// 单次请求超时时间
    pub request_timeout: Duration,
    /// 响应体最大字节数
    pub max_response_bytes: usize,
    /// 每个类目最多抓取的页数
    pub max_pages_per_category: u32,
    /// 每批最多处理的商品数
    pub max_products_per_batch: usize,
    /// 同时进行的类目任务数
    pub max_concurrent_categories: usize,
}

impl CrawlOptions {
    pub fn from_settings(settings: &ScraperSettings) -> Self {
        Self {
            request_timeout: settings.request_timeout(),
            max_response_bytes: settings.max_response_bytes,
            max_pages_per_category: settings.max_pages_per_category,
            max_products_per_batch: settings.max_products_per_batch,
            max_concurrent_categories: settings.max_concurrent_categories,
        }
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from_settings(&ScraperSettings::default())
    }
}

/// 爬取服务
///
/// 编排类目列表页遍历和商品详情批量抓取。
/// 每个类目任务独占自己的 `CrawlState`；任务之间并行，任务内部的页面严格串行。
pub struct CrawlService<F: PageFetcher> {
    /// 页面抓取器
    fetcher: Arc<F>,
    /// 身份轮换器
    rotator: IdentityRotator,
    /// 请求间隔策略
    delay: Arc<dyn DelayPolicy>,
    /// 诊断收集器
    diagnostics: Arc<dyn DiagnosticsCollector>,
    /// 爬取选项
    options: CrawlOptions,
    /// 已分配的身份数量
    identity_counter: AtomicUsize,
}

impl<F: PageFetcher> CrawlService<F> {
    /// 创建新的爬取服务实例
    ///
    /// 默认不等待、不收集诊断信息
    ///
    /// # 参数
    ///
    /// * `fetcher` - 页面抓取器
    /// * `rotator` - 身份轮换器
    /// * `options` - 爬取选项
    pub fn new(fetcher: Arc<F>, rotator: IdentityRotator, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            rotator,
            delay: Arc::new(NoDelay),
            diagnostics: Arc::new(NoopDiagnostics),
            options,
            identity_counter: AtomicUsize::new(0),
        }
    }

    /// 根据抓取器配置创建实例，使用随机请求间隔
    pub fn from_settings(fetcher: Arc<F>, settings: &ScraperSettings) -> Self {
        Self::new(
            fetcher,
            IdentityRotator::from_settings(settings),
            CrawlOptions::from_settings(settings),
        )
        .with_delay(Arc::new(RandomDelay::from_millis(
            settings.inter_page_delay_min_ms,
            settings.inter_page_delay_max_ms,
        )))
    }

    pub fn with_delay(mut self, delay: Arc<dyn DelayPolicy>) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsCollector>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// 为下一个爬取单元分配身份
    pub fn next_identity(&self) -> ClientIdentity {
        let index = self.identity_counter.fetch_add(1, Ordering::Relaxed);
        self.rotator.next(index)
    }

    fn request<'a>(&self, url: &'a str, identity: &'a ClientIdentity) -> FetchRequest<'a> {
        FetchRequest {
            url,
            identity,
            timeout: self.options.request_timeout,
            max_bytes: self.options.max_response_bytes,
        }
    }

    /// 抓取页面，取消时返回 `None`
    async fn fetch_cancellable(
        &self,
        url: &str,
        identity: &ClientIdentity,
        cancel: &CancellationToken,
    ) -> Option<FetchResult> {
        tokio::select! {
            _ = cancel.cancelled() => None,
            result = self.fetcher.fetch(self.request(url, identity)) => Some(result),
        }
    }

    /// 执行请求间隔，取消时返回 `false`
    async fn pause_cancellable(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = self.delay.pause() => true,
        }
    }

    async fn report(&self, url: &str, kind: FailureKind, markup: &str) {
        let event = DiagnosticEvent::new(url, kind, markup);
        if let Err(e) = self.diagnostics.record(event).await {
            warn!(url = %url, error = %e, "Failed to record diagnostics");
        }
    }

    /// 爬取单个类目
    ///
    /// 从类目起始页开始，依次执行 抓取 → 分类 → 提取 → 翻页，直到终止条件出现。
    /// 被拦截或抓取失败的页面直接终止任务，不做重试。
    ///
    /// # 参数
    ///
    /// * `category_url` - 类目起始URL
    /// * `identity` - 本任务使用的客户端身份
    /// * `limit` - 商品数量上限
    /// * `cancel` - 取消令牌
    ///
    /// # 返回值
    ///
    /// 类目报告，包含按发现顺序去重后的商品引用和终止原因
    #[instrument(
        skip(self, identity, cancel),
        fields(job_id = %Uuid::new_v4(), user_agent = %identity.user_agent)
    )]
    pub async fn crawl_category(
        &self,
        category_url: &str,
        identity: &ClientIdentity,
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> CategoryReport {
        let mut state = CrawlState::new(category_url);

        if limit == Some(0) {
            state.terminate(TerminationReason::ProductLimit);
        }

        while !state.is_terminated() {
            if cancel.is_cancelled() {
                state.terminate(TerminationReason::Cancelled);
                break;
            }

            state.begin_page();
            let page_url = state.current_page_url.clone();

            let Some(result) = self.fetch_cancellable(&page_url, identity, cancel).await else {
                state.terminate(TerminationReason::Cancelled);
                break;
            };

            state.enter(CrawlPhase::Classifying);
            let classification = BlockDetector::classify(&result);
            if !classification.is_normal() {
                warn!(
                    url = %page_url,
                    page = state.page_count(),
                    classification = %classification,
                    error = ?result.error,
                    "Listing page not usable, stopping category"
                );
                self.report(
                    &page_url,
                    FailureKind::Classification(classification),
                    &result.body,
                )
                .await;
                state.terminate(TerminationReason::Blocked(classification));
                break;
            }

            state.enter(CrawlPhase::ExtractingListing);
            let (refs, next) = parse_listing(&result, &page_url);
            let found = refs.len();
            let added = state.absorb(refs);
            info!(
                url = %page_url,
                page = state.page_count(),
                found,
                added,
                total = state.seen_count(),
                "Listing page processed"
            );

            if limit.is_some_and(|l| state.seen_count() >= l) {
                state.terminate(TerminationReason::ProductLimit);
                break;
            }

            state.enter(CrawlPhase::Paginating);
            let Some(next) = next else {
                state.terminate(TerminationReason::Exhausted);
                break;
            };

            let next = next.to_string();
            if state.has_visited(&next) {
                debug!(next = %next, "Next page already visited");
                state.terminate(TerminationReason::PaginationCycle);
            } else if state.page_count() >= self.options.max_pages_per_category {
                state.terminate(TerminationReason::PageLimit);
            } else if !self.pause_cancellable(cancel).await {
                state.terminate(TerminationReason::Cancelled);
            } else {
                state.advance(next);
            }
        }

        let report = state.into_report(category_url, limit);
        info!(
            products = report.products.len(),
            pages = report.pages_visited,
            termination = %report.termination,
            "Category finished"
        );
        report
    }

    /// 并行爬取多个类目
    ///
    /// 每个类目分配一个身份，最多同时运行 `max_concurrent_categories` 个任务；
    /// 返回的报告顺序与输入顺序一致
    pub async fn crawl_categories(
        &self,
        category_urls: &[String],
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> Vec<CategoryReport> {
        let concurrency = self.options.max_concurrent_categories.max(1);

        // Identities are assigned in input order before any job starts
        let jobs: Vec<BoxFuture<'_, CategoryReport>> = category_urls
            .iter()
            .map(move |url| {
                let identity = self.next_identity();
                async move { self.crawl_category(url, &identity, limit, cancel).await }.boxed()
            })
            .collect();

        stream::iter(jobs).buffered(concurrency).collect().await
    }

    /// 爬取多个类目并汇总商品URL
    pub async fn scrape_product_urls(
        &self,
        category_urls: &[String],
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> Vec<String> {
        let reports = self.crawl_categories(category_urls, limit, cancel).await;
        aggregate_product_urls(&reports, limit)
    }

    /// 批量抓取商品详情
    ///
    /// # 参数
    ///
    /// * `product_urls` - 商品URL列表
    /// * `cancel` - 取消令牌
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<ProductRecord>)` - 与输入一一对应、顺序一致的记录
    /// * `Err(CrawlError::BatchSizeExceeded)` - 批量超限，未发起任何请求
    #[instrument(skip(self, product_urls, cancel), fields(batch_id = %Uuid::new_v4(), count = product_urls.len()))]
    pub async fn try_fetch_product_details(
        &self,
        product_urls: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<ProductRecord>, CrawlError> {
        let max = self.options.max_products_per_batch;
        if product_urls.len() > max {
            return Err(CrawlError::BatchSizeExceeded {
                requested: product_urls.len(),
                max,
            });
        }

        let identity = self.next_identity();
        let mut records = Vec::with_capacity(product_urls.len());

        for (index, url) in product_urls.iter().enumerate() {
            if index > 0 && !cancel.is_cancelled() {
                self.pause_cancellable(cancel).await;
            }
            if cancel.is_cancelled() {
                records.push(ProductRecord::failed(url.as_str(), CANCELLED));
                continue;
            }
            records.push(self.fetch_product_detail(url, &identity, cancel).await);
        }

        let failed = records.iter().filter(|r| r.is_error()).count();
        info!(total = records.len(), failed, "Detail batch finished");
        Ok(records)
    }

    /// 批量抓取商品详情；批量超限时返回唯一一条错误记录
    pub async fn fetch_product_details(
        &self,
        product_urls: &[String],
        cancel: &CancellationToken,
    ) -> Vec<ProductRecord> {
        match self.try_fetch_product_details(product_urls, cancel).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Detail batch rejected");
                vec![ProductRecord::batch_rejected(
                    self.options.max_products_per_batch,
                )]
            }
        }
    }

    async fn fetch_product_detail(
        &self,
        url: &str,
        identity: &ClientIdentity,
        cancel: &CancellationToken,
    ) -> ProductRecord {
        let Some(result) = self.fetch_cancellable(url, identity, cancel).await else {
            return ProductRecord::failed(url, CANCELLED);
        };

        let classification = BlockDetector::classify(&result);
        match classification {
            PageClassification::Normal => {}
            PageClassification::FetchFailed => {
                let reason = result
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| classification.to_string());
                warn!(url = %url, reason = %reason, "Product fetch failed");
                self.report(url, FailureKind::Classification(classification), &result.body)
                    .await;
                return ProductRecord::failed(url, reason);
            }
            PageClassification::Captcha | PageClassification::Interstitial => {
                let reason = classification
                    .block_error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| classification.to_string());
                warn!(url = %url, classification = %classification, "Product page blocked");
                self.report(url, FailureKind::Classification(classification), &result.body)
                    .await;
                return ProductRecord::failed(url, reason);
            }
        }

        if !result.is_success_status() {
            let code = result.status_code.unwrap_or_default();
            warn!(url = %url, status = code, "Product page returned non-success status");
            return ProductRecord::failed(url, format!("HTTP {}", code));
        }

        let detail = DetailExtractor::extract_detail(&result.body, url);
        for gap in detail.gaps() {
            warn!(url = %url, gap = %gap, "Product field missing");
            self.report(url, FailureKind::Extraction(gap), &result.body)
                .await;
        }

        ProductRecord::extracted(url, detail.title, detail.price, detail.currency)
    }
}

/// 解析列表页，返回商品引用（文档顺序）和下一页URL
///
/// 同步完成解析，`Html` 不会跨越 `.await`
fn parse_listing(result: &FetchResult, page_url: &str) -> (Vec<ProductRef>, Option<Url>) {
    let Ok(base) = Url::parse(&result.final_url).or_else(|_| Url::parse(page_url)) else {
        return (Vec::new(), None);
    };
    let current = Url::parse(page_url).unwrap_or_else(|_| base.clone());

    let document = Html::parse_document(&result.body);
    let refs = ListingExtractor::ordered_refs(&document, &base);
    let next = Paginator::next_from_document(&document, &base).filter(|next| next != &current);
    (refs, next)
}

/// 跨类目汇总商品URL：按报告顺序去重，并应用总数上限
pub fn aggregate_product_urls(reports: &[CategoryReport], limit: Option<usize>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls: Vec<String> = reports
        .iter()
        .flat_map(|report| report.products.iter())
        .filter(|product| seen.insert(product.dedup_key().to_string()))
        .map(|product| product.url.clone())
        .collect();

    if let Some(limit) = limit {
        urls.truncate(limit);
    }
    urls
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
