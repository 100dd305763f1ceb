// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use catalogrs::domain::models::product::NOT_AVAILABLE;
use catalogrs::domain::services::crawl_service::CrawlOptions;
use catalogrs::utils::errors::CrawlError;
use tokio_util::sync::CancellationToken;

use crate::helpers::{crawl_service, product_page, product_url, ScriptedFetcher};

#[tokio::test]
async fn test_batch_over_ceiling_yields_single_record_without_fetching() {
    // Given: 上限为 5，请求 6 个URL
    let urls: Vec<String> = (1..=6).map(|i| product_url(&format!("B00000000{}", i))).collect();
    let (service, fetcher) = crawl_service(ScriptedFetcher::new(), CrawlOptions::default());

    // When
    let records = service
        .fetch_product_details(&urls, &CancellationToken::new())
        .await;

    // Then
    assert_eq!(records.len(), 1);
    assert!(records[0].url.is_none());
    assert_eq!(
        records[0].product_name,
        "ERROR: Too many URLs in one request (max 5)"
    );
    assert!(fetcher.fetched_urls().is_empty());

    let error = service
        .try_fetch_product_details(&urls, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        error,
        CrawlError::BatchSizeExceeded {
            requested: 6,
            max: 5
        }
    );
}

#[tokio::test]
async fn test_records_match_input_order_with_failures_inline() {
    // Given: 正常页、中间页、验证码页和网络失败
    let ok = product_url("B000000001");
    let interstitial = product_url("B000000002");
    let captcha = product_url("B000000003");
    let unreachable = product_url("B000000004");
    let fetcher = ScriptedFetcher::new()
        .page(&ok, product_page("Electric Kettle", "$24.99"))
        .page(
            &interstitial,
            "<html><body><h4>Enter the characters you see below</h4></body></html>",
        )
        .page(
            &captcha,
            "<html><body><p>Type the characters you see in this image:</p></body></html>",
        );
    let (service, _) = crawl_service(fetcher, CrawlOptions::default());
    let urls = vec![ok.clone(), interstitial.clone(), captcha.clone(), unreachable.clone()];

    // When
    let records = service
        .fetch_product_details(&urls, &CancellationToken::new())
        .await;

    // Then: 每个URL一条记录，顺序一致
    assert_eq!(records.len(), 4);
    let record_urls: Vec<Option<String>> = records.iter().map(|r| r.url.clone()).collect();
    assert_eq!(
        record_urls,
        urls.iter().cloned().map(Some).collect::<Vec<_>>()
    );

    assert_eq!(records[0].product_name, "Electric Kettle");
    assert_eq!(records[0].price, "$24.99");
    assert_eq!(records[0].currency, "$");
    assert!(records[0].error.is_none());

    assert_eq!(records[1].product_name, NOT_AVAILABLE);
    assert_eq!(records[1].error.as_deref(), Some("Blocked/interstitial page"));

    assert_eq!(records[2].error.as_deref(), Some("CAPTCHA detected"));

    assert_eq!(records[3].price, NOT_AVAILABLE);
    assert!(records[3]
        .error
        .as_deref()
        .is_some_and(|e| e.contains("no route to host")));
}
