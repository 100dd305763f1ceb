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

use catalogrs::config::settings::Settings;
use catalogrs::domain::services::crawl_service::CrawlService;
use catalogrs::engines::reqwest_engine::ReqwestEngine;
use catalogrs::infrastructure::diagnostics::create_diagnostics_collector;
use catalogrs::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use catalogrs::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting catalogrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Initialize crawl service
    let diagnostics = create_diagnostics_collector(&settings.diagnostics);
    let service = Arc::new(
        CrawlService::from_settings(Arc::new(ReqwestEngine), &settings.scraper)
            .with_diagnostics(diagnostics),
    );
    info!(
        max_batch = settings.scraper.max_products_per_batch,
        max_pages = settings.scraper.max_pages_per_category,
        concurrency = settings.scraper.max_concurrent_categories,
        "Crawl service initialized"
    );

    // 4. Start HTTP server
    let app = routes::routes(service);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
