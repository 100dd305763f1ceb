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

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use catalogrs::config::settings::Settings;
use catalogrs::domain::services::crawl_service::CrawlService;
use catalogrs::engines::reqwest_engine::ReqwestEngine;
use catalogrs::infrastructure::diagnostics::create_diagnostics_collector;
use catalogrs::infrastructure::export::{self, ExportFormat};
use catalogrs::utils::telemetry;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Category product URL crawler and product detail extractor")]
#[command(version)]
struct Cli {
    /// Proxy server used for every request (overrides the configured pool)
    #[arg(long, global = true, env = "CATALOGRS_PROXY")]
    proxy: Option<String>,

    /// Use the same identity for every category
    #[arg(long, global = true)]
    no_rotate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect product URLs from one or more category pages
    Categories {
        /// Category URLs to crawl
        #[arg(required = true)]
        urls: Vec<String>,
        /// Maximum number of product URLs per category
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output CSV file
        #[arg(short, long, default_value = "catalog_products.csv")]
        output: PathBuf,
    },

    /// Extract title, price and currency for product URLs listed in a file
    Details {
        /// Input file with one product URL per line
        input: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Output file name (extension added when missing)
        #[arg(short, long, default_value = "product_details")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();
    let cli = Cli::parse();

    let mut settings = Settings::new()?;
    if let Some(proxy) = cli.proxy.clone() {
        settings.scraper.proxy_pool = vec![proxy];
    }
    if cli.no_rotate {
        settings.scraper.rotate_identity_per_category = false;
    }

    let service = CrawlService::from_settings(Arc::new(ReqwestEngine), &settings.scraper)
        .with_diagnostics(create_diagnostics_collector(&settings.diagnostics));

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with partial results");
            signal_token.cancel();
        }
    });

    match cli.command {
        Commands::Categories {
            urls,
            limit,
            output,
        } => {
            let reports = service.crawl_categories(&urls, limit, &cancel).await;
            for report in &reports {
                info!(
                    category = %report.category_url,
                    products = report.products.len(),
                    pages = report.pages_visited,
                    termination = %report.termination,
                    "Category summary"
                );
            }
            let rows = export::save_category_csv(&output, &reports)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(rows, path = %output.display(), "Results saved");
        }
        Commands::Details {
            input,
            format,
            output,
        } => {
            let content = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let urls: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();

            // The file is processed in batches no larger than the configured ceiling
            let batch_size = service.options().max_products_per_batch.max(1);
            let mut records = Vec::with_capacity(urls.len());
            for chunk in urls.chunks(batch_size) {
                records.extend(service.fetch_product_details(chunk, &cancel).await);
            }

            let path = export::output_path(&output, format);
            export::save_records(&path, &records, format)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let failed = records.iter().filter(|r| r.is_error()).count();
            info!(
                total = records.len(),
                failed,
                path = %path.display(),
                "Processed product URLs"
            );
        }
    }

    Ok(())
}
