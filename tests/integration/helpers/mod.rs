// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum_test::TestServer;
use catalogrs::domain::models::page::FetchResult;
use catalogrs::domain::services::crawl_service::{CrawlOptions, CrawlService};
use catalogrs::engines::identity::IdentityRotator;
use catalogrs::engines::traits::{FetchRequest, PageFetcher};
use catalogrs::presentation::routes;
use catalogrs::utils::errors::FetchError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const CATEGORY: &str = "https://www.amazon.com/s?k=kettle";

/// 第 n 页的URL（第 1 页为类目起始URL）
pub fn page_url(n: u32) -> String {
    if n <= 1 {
        CATEGORY.to_string()
    } else {
        format!("{}&page={}", CATEGORY, n)
    }
}

pub fn product_url(id: &str) -> String {
    format!("https://www.amazon.com/dp/{}", id)
}

/// 生成列表页：商品链接 + 可选的下一页链接
pub fn listing_page(product_hrefs: &[&str], next: Option<&str>) -> String {
    let mut html = String::from("<html><head><title>Amazon.com : kettle</title></head><body>");
    for href in product_hrefs {
        html.push_str(&format!(
            r#"<div class="s-result-item"><a class="a-link-normal" href="{}">item</a></div>"#,
            href
        ));
    }
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<a class="s-pagination-item s-pagination-next" href="{}">Next</a>"#,
            next
        ));
    }
    html.push_str("</body></html>");
    html
}

pub fn product_page(title: &str, price: &str) -> String {
    format!(
        r#"<html><head><title>Amazon.com: {title}</title></head><body>
        <span id="productTitle">{title}</span>
        <span class="a-price"><span class="a-offscreen">{price}</span></span>
        </body></html>"#
    )
}

/// 按脚本返回页面的抓取器
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, FetchResult>,
    stalls: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages
            .insert(url.to_string(), FetchResult::success(url, 200, body.into()));
        self
    }

    /// 抓取该URL时挂起指定时长
    pub fn stall(mut self, url: &str, duration: Duration) -> Self {
        self.stalls.insert(url.to_string(), duration);
        self
    }

    /// 已请求的URL（按请求顺序）
    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(url, _)| url.clone()).collect()
    }

    /// 每次请求使用的 User-Agent
    pub fn user_agents(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, ua)| ua.clone()).collect()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult {
        self.calls.lock().push((
            request.url.to_string(),
            request.identity.user_agent.clone(),
        ));

        if let Some(duration) = self.stalls.get(request.url) {
            tokio::time::sleep(*duration).await;
        }

        self.pages.get(request.url).cloned().unwrap_or_else(|| {
            FetchResult::failure(
                request.url,
                FetchError::NetworkFailure("no route to host".to_string()),
            )
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn test_rotator() -> IdentityRotator {
    IdentityRotator::new(
        vec![
            "TestAgent/0".to_string(),
            "TestAgent/1".to_string(),
            "TestAgent/2".to_string(),
        ],
        vec![],
    )
}

/// 构建不等待的爬取服务
pub fn crawl_service(
    fetcher: ScriptedFetcher,
    options: CrawlOptions,
) -> (Arc<CrawlService<ScriptedFetcher>>, Arc<ScriptedFetcher>) {
    let fetcher = Arc::new(fetcher);
    let service = CrawlService::new(fetcher.clone(), test_rotator(), options);
    (Arc::new(service), fetcher)
}

pub fn test_server(service: Arc<CrawlService<ScriptedFetcher>>) -> TestServer {
    TestServer::new(routes::routes(service)).unwrap()
}
