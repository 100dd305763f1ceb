// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use catalogrs::domain::models::crawl::TerminationReason;
use catalogrs::domain::models::identity::ClientIdentity;
use catalogrs::domain::models::page::PageClassification;
use catalogrs::domain::services::crawl_service::CrawlOptions;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::helpers::{crawl_service, listing_page, page_url, product_url, ScriptedFetcher, CATEGORY};

fn identity() -> ClientIdentity {
    ClientIdentity::new("TestAgent/0", None)
}

#[tokio::test]
async fn test_dedup_across_pages_including_query_variants() {
    // Given: 两页列表，第二页重复出现带不同查询参数的商品
    let fetcher = ScriptedFetcher::new()
        .page(
            &page_url(1),
            listing_page(
                &["/dp/B000000001?ref=sr_1_1", "/dp/B000000002"],
                Some("/s?k=kettle&page=2"),
            ),
        )
        .page(
            &page_url(2),
            listing_page(&["/dp/B000000001?ref=sr_2_7#reviews", "/dp/B000000003"], None),
        );
    let (service, fetcher) = crawl_service(fetcher, CrawlOptions::default());

    // When
    let report = service
        .crawl_category(CATEGORY, &identity(), None, &CancellationToken::new())
        .await;

    // Then: 商品按发现顺序去重
    assert_eq!(
        report.product_urls(),
        vec![
            product_url("B000000001"),
            product_url("B000000002"),
            product_url("B000000003"),
        ]
    );
    assert_eq!(report.termination, TerminationReason::Exhausted);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(fetcher.fetched_urls(), vec![page_url(1), page_url(2)]);
}

#[tokio::test]
async fn test_dedup_across_pages_with_ref_segments_and_slugs() {
    // Given: 同一 ASIN 在两页中以不同的路径写法出现
    let fetcher = ScriptedFetcher::new()
        .page(
            &page_url(1),
            listing_page(
                &["/Electric-Kettle/dp/B000000001/ref=sr_1_1?k=kettle"],
                Some("/s?k=kettle&page=2"),
            ),
        )
        .page(
            &page_url(2),
            listing_page(
                &["/Electric-Kettle/dp/B000000001/ref=sr_1_17?k=kettle", "/dp/B000000001"],
                None,
            ),
        );
    let (service, _) = crawl_service(fetcher, CrawlOptions::default());

    // When
    let report = service
        .crawl_category(CATEGORY, &identity(), None, &CancellationToken::new())
        .await;

    // Then: 只保留首次发现的一条
    assert_eq!(
        report.product_urls(),
        vec!["https://www.amazon.com/Electric-Kettle/dp/B000000001".to_string()]
    );
    assert_eq!(report.products[0].asin.as_deref(), Some("B000000001"));
}

#[tokio::test]
async fn test_page_limit_fetches_exactly_first_pages() {
    // Given: 五页列表，每页都有下一页
    let mut fetcher = ScriptedFetcher::new();
    for n in 1..=5u32 {
        let product = format!("/dp/B00000000{}", n);
        let next = format!("/s?k=kettle&page={}", n + 1);
        fetcher = fetcher.page(&page_url(n), listing_page(&[product.as_str()], Some(next.as_str())));
    }
    let options = CrawlOptions {
        max_pages_per_category: 3,
        ..CrawlOptions::default()
    };
    let (service, fetcher) = crawl_service(fetcher, options);

    // When
    let report = service
        .crawl_category(CATEGORY, &identity(), None, &CancellationToken::new())
        .await;

    // Then: 只请求了第 1..3 页
    assert_eq!(report.termination, TerminationReason::PageLimit);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(
        fetcher.fetched_urls(),
        vec![page_url(1), page_url(2), page_url(3)]
    );
    assert_eq!(report.products.len(), 3);
}

#[tokio::test]
async fn test_captcha_short_circuits_even_with_product_anchors() {
    // Given: 第二页是带商品链接的验证码页
    let captcha = r#"<html><head><title>Amazon.com CAPTCHA</title></head><body>
        <form action="/errors/validateCaptcha"><a href="/dp/B000000009">x</a></form>
        <a class="s-pagination-next" href="/s?k=kettle&page=3">Next</a></body></html>"#;
    let fetcher = ScriptedFetcher::new()
        .page(
            &page_url(1),
            listing_page(&["/dp/B000000001"], Some("/s?k=kettle&page=2")),
        )
        .page(&page_url(2), captcha)
        .page(&page_url(3), listing_page(&["/dp/B000000003"], None));
    let (service, fetcher) = crawl_service(fetcher, CrawlOptions::default());

    // When
    let report = service
        .crawl_category(CATEGORY, &identity(), None, &CancellationToken::new())
        .await;

    // Then: 验证码页的商品不被提取，也不会继续翻页
    assert_eq!(
        report.termination,
        TerminationReason::Blocked(PageClassification::Captcha)
    );
    assert_eq!(report.product_urls(), vec![product_url("B000000001")]);
    assert_eq!(fetcher.fetched_urls(), vec![page_url(1), page_url(2)]);
}

#[tokio::test]
async fn test_pagination_cycle_terminates() {
    // Given: 第二页的“下一页”指回第一页
    let fetcher = ScriptedFetcher::new()
        .page(
            &page_url(1),
            listing_page(&["/dp/B000000001"], Some("/s?k=kettle&page=2")),
        )
        .page(
            &page_url(2),
            listing_page(&["/dp/B000000002"], Some("/s?k=kettle")),
        );
    let (service, fetcher) = crawl_service(fetcher, CrawlOptions::default());

    // When
    let report = service
        .crawl_category(CATEGORY, &identity(), None, &CancellationToken::new())
        .await;

    // Then
    assert_eq!(report.termination, TerminationReason::PaginationCycle);
    assert_eq!(report.products.len(), 2);
    assert_eq!(fetcher.fetched_urls().len(), 2);
}

#[tokio::test]
async fn test_cancellation_returns_partial_results() {
    // Given: 第二页的抓取会挂起很久
    let fetcher = ScriptedFetcher::new()
        .page(
            &page_url(1),
            listing_page(
                &["/dp/B000000001", "/dp/B000000002"],
                Some("/s?k=kettle&page=2"),
            ),
        )
        .page(&page_url(2), listing_page(&["/dp/B000000003"], None))
        .stall(&page_url(2), Duration::from_secs(30));
    let (service, _fetcher) = crawl_service(fetcher, CrawlOptions::default());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    // When
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        service.crawl_category(CATEGORY, &identity(), None, &cancel),
    )
    .await
    .expect("cancellation should stop the crawl promptly");

    // Then: 已累积的商品被保留
    assert_eq!(report.termination, TerminationReason::Cancelled);
    assert_eq!(
        report.product_urls(),
        vec![product_url("B000000001"), product_url("B000000002")]
    );
}

#[tokio::test]
async fn test_categories_get_distinct_identities_and_aggregate() {
    // Given: 两个类目有一个共同商品
    let shoes = "https://www.amazon.com/s?k=shoes";
    let fetcher = ScriptedFetcher::new()
        .page(
            CATEGORY,
            listing_page(&["/dp/B000000001", "/dp/B000000002"], None),
        )
        .page(
            shoes,
            listing_page(&["/dp/B000000002", "/dp/B000000003"], None),
        );
    let options = CrawlOptions {
        max_concurrent_categories: 1,
        ..CrawlOptions::default()
    };
    let (service, fetcher) = crawl_service(fetcher, options);
    let categories = vec![CATEGORY.to_string(), shoes.to_string()];

    // When
    let urls = service
        .scrape_product_urls(&categories, Some(10), &CancellationToken::new())
        .await;

    // Then
    assert_eq!(
        urls,
        vec![
            product_url("B000000001"),
            product_url("B000000002"),
            product_url("B000000003"),
        ]
    );
    assert_eq!(
        fetcher.user_agents(),
        vec!["TestAgent/0".to_string(), "TestAgent/1".to_string()]
    );
}
