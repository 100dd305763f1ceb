// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::services::crawl_service::CrawlService;
use crate::engines::traits::PageFetcher;
use crate::presentation::handlers::product_handler;

pub fn routes<F>(service: Arc<CrawlService<F>>) -> Router
where
    F: PageFetcher + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let scrape_routes = Router::new()
        .route(
            "/scrape-product-urls",
            post(product_handler::scrape_product_urls::<F>),
        )
        .route(
            "/scrape-product-details",
            post(product_handler::scrape_product_details::<F>),
        )
        .layer(Extension(service));

    Router::new()
        .merge(public_routes)
        .merge(scrape_routes)
        .layer(TraceLayer::new_for_http())
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
