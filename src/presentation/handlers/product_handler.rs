// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::rejection::JsonRejection, response::IntoResponse, Extension, Json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::dto::product_details_request::ProductDetailsRequestDto;
use crate::application::dto::product_response::{ProductDetailsResponseDto, ProductUrlsResponseDto};
use crate::application::dto::product_urls_request::ProductUrlsRequestDto;
use crate::domain::services::crawl_service::CrawlService;
use crate::engines::traits::PageFetcher;
use crate::presentation::errors::AppError;

/// 抓取类目商品URL
///
/// 请求体：`{"categoryUrls": [...], "limit": 10}`；响应体：`{"productUrls": [...]}`
pub async fn scrape_product_urls<F>(
    Extension(service): Extension<Arc<CrawlService<F>>>,
    payload: Result<Json<ProductUrlsRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    F: PageFetcher + 'static,
{
    let Json(payload) = payload?;
    let (category_urls, limit) = payload.validated()?;
    info!(categories = category_urls.len(), limit, "Scraping product URLs");

    // Dropping the request future (client disconnect) also stops the crawl
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let product_urls = service
        .scrape_product_urls(&category_urls, Some(limit), &cancel)
        .await;

    Ok(Json(ProductUrlsResponseDto { product_urls }))
}

/// 抓取商品详情
///
/// 请求体：`{"productUrls": [...]}`；响应体：`{"productDetails": [...]}`。
/// 超出批量上限时返回一条错误记录。
pub async fn scrape_product_details<F>(
    Extension(service): Extension<Arc<CrawlService<F>>>,
    payload: Result<Json<ProductDetailsRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    F: PageFetcher + 'static,
{
    let Json(payload) = payload?;
    let product_urls = payload.validated()?;
    info!(count = product_urls.len(), "Scraping product details");

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let product_details = service
        .fetch_product_details(&product_urls, &cancel)
        .await;

    Ok(Json(ProductDetailsResponseDto { product_details }))
}
