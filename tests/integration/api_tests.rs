// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use catalogrs::domain::services::crawl_service::CrawlOptions;
use serde_json::{json, Value};

use crate::helpers::{
    crawl_service, listing_page, page_url, product_page, product_url, test_server,
    ScriptedFetcher, CATEGORY,
};

#[tokio::test]
async fn test_health_and_version() {
    let (service, _) = crawl_service(ScriptedFetcher::new(), CrawlOptions::default());
    let server = test_server(service);

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.text(), "OK");

    let version = server.get("/v1/version").await;
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_scrape_product_urls_applies_limit() {
    // Given
    let fetcher = ScriptedFetcher::new()
        .page(
            &page_url(1),
            listing_page(
                &["/dp/B000000001", "/dp/B000000002"],
                Some("/s?k=kettle&page=2"),
            ),
        )
        .page(
            &page_url(2),
            listing_page(&["/dp/B000000003", "/dp/B000000004"], None),
        );
    let (service, _) = crawl_service(fetcher, CrawlOptions::default());
    let server = test_server(service);

    // When
    let response = server
        .post("/scrape-product-urls")
        .json(&json!({ "categoryUrls": [CATEGORY], "limit": 3 }))
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "productUrls": [
                product_url("B000000001"),
                product_url("B000000002"),
                product_url("B000000003"),
            ]
        })
    );
}

#[tokio::test]
async fn test_scrape_product_urls_rejects_malformed_input() {
    let (service, fetcher) = crawl_service(ScriptedFetcher::new(), CrawlOptions::default());
    let server = test_server(service);

    for payload in [
        json!({ "categoryUrls": [] }),
        json!({ "categoryUrls": ["not a url"] }),
        json!({ "categoryUrls": [CATEGORY], "limit": 0 }),
        json!({ "categoryUrls": "https://www.amazon.com/s?k=kettle" }),
    ] {
        let response = server.post("/scrape-product-urls").json(&payload).await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "payload {} should be rejected",
            payload
        );
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    assert!(fetcher.fetched_urls().is_empty());
}

#[tokio::test]
async fn test_scrape_product_details() {
    // Given
    let fetcher = ScriptedFetcher::new().page(
        &product_url("B000000001"),
        product_page("Electric Kettle", "$24.99"),
    );
    let (service, _) = crawl_service(fetcher, CrawlOptions::default());
    let server = test_server(service);

    // When
    let response = server
        .post("/scrape-product-details")
        .json(&json!({ "productUrls": [product_url("B000000001")] }))
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "productDetails": [{
                "url": product_url("B000000001"),
                "product_name": "Electric Kettle",
                "price": "$24.99",
                "currency": "$"
            }]
        })
    );
}

#[tokio::test]
async fn test_scrape_product_details_over_ceiling_is_not_an_http_error() {
    let (service, fetcher) = crawl_service(ScriptedFetcher::new(), CrawlOptions::default());
    let server = test_server(service);
    let urls: Vec<String> = (1..=6).map(|i| product_url(&format!("B00000000{}", i))).collect();

    let response = server
        .post("/scrape-product-details")
        .json(&json!({ "productUrls": urls }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let details = body["productDetails"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert!(details[0]["url"].is_null());
    assert!(fetcher.fetched_urls().is_empty());
}

#[tokio::test]
async fn test_scrape_product_urls_across_categories() {
    // Given: 两个类目共享一个商品
    let shoes = "https://www.amazon.com/s?k=shoes";
    let fetcher = ScriptedFetcher::new()
        .page(CATEGORY, listing_page(&["/dp/B000000001", "/dp/B000000002"], None))
        .page(shoes, listing_page(&["/dp/B000000002", "/dp/B000000003"], None));
    let (service, fetcher) = crawl_service(fetcher, CrawlOptions::default());
    let server = test_server(service);

    // When
    let response = server
        .post("/scrape-product-urls")
        .json(&json!({ "categoryUrls": [CATEGORY, shoes] }))
        .await;

    // Then
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body["productUrls"],
        json!([
            product_url("B000000001"),
            product_url("B000000002"),
            product_url("B000000003"),
        ])
    );
    assert_eq!(fetcher.fetched_urls().len(), 2);
}
