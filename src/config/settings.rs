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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、抓取器和诊断收集等所有配置项
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取器配置
    pub scraper: ScraperSettings,
    /// 诊断配置
    pub diagnostics: DiagnosticsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// 抓取器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// User-Agent 池，为空时使用内置浏览器列表
    #[serde(default)]
    pub user_agent_pool: Vec<String>,
    /// 代理池
    #[serde(default)]
    pub proxy_pool: Vec<String>,
    /// 单次请求超时时间（毫秒）
    pub request_timeout_ms: u64,
    /// 响应体最大字节数
    pub max_response_bytes: usize,
    /// 请求间隔下限（毫秒）
    pub inter_page_delay_min_ms: u64,
    /// 请求间隔上限（毫秒）
    pub inter_page_delay_max_ms: u64,
    /// 每个类目最多抓取的页数
    pub max_pages_per_category: u32,
    /// 每批最多处理的商品数
    pub max_products_per_batch: usize,
    /// 是否为每个类目轮换客户端身份
    pub rotate_identity_per_category: bool,
    /// 同时进行的类目任务数
    pub max_concurrent_categories: usize,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agent_pool: Vec::new(),
            proxy_pool: Vec::new(),
            request_timeout_ms: 15_000,
            max_response_bytes: 2 * 1024 * 1024,
            inter_page_delay_min_ms: 1_000,
            inter_page_delay_max_ms: 3_000,
            max_pages_per_category: 400,
            max_products_per_batch: 5,
            rotate_identity_per_category: true,
            max_concurrent_categories: 2,
        }
    }
}

impl ScraperSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// 诊断配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsSettings {
    /// 是否将失败页面写入本地目录
    pub enabled: bool,
    /// 诊断文件目录
    pub directory: String,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: "./diagnostics".to_string(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("CATALOGRS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scraper.user_agent_pool")
                    .with_list_parse_key("scraper.proxy_pool")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    fn with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let scraper = ScraperSettings::default();
        let diagnostics = DiagnosticsSettings::default();
        let server = ServerSettings::default();

        Config::builder()
            // Start with default settings
            .set_default("server.host", server.host)?
            .set_default("server.port", server.port)?
            // Default scraper settings
            .set_default("scraper.user_agent_pool", Vec::<String>::new())?
            .set_default("scraper.proxy_pool", Vec::<String>::new())?
            .set_default("scraper.request_timeout_ms", scraper.request_timeout_ms)?
            .set_default("scraper.max_response_bytes", scraper.max_response_bytes as u64)?
            .set_default("scraper.inter_page_delay_min_ms", scraper.inter_page_delay_min_ms)?
            .set_default("scraper.inter_page_delay_max_ms", scraper.inter_page_delay_max_ms)?
            .set_default("scraper.max_pages_per_category", scraper.max_pages_per_category)?
            .set_default("scraper.max_products_per_batch", scraper.max_products_per_batch as u64)?
            .set_default(
                "scraper.rotate_identity_per_category",
                scraper.rotate_identity_per_category,
            )?
            .set_default(
                "scraper.max_concurrent_categories",
                scraper.max_concurrent_categories as u64,
            )?
            // Default diagnostics settings
            .set_default("diagnostics.enabled", diagnostics.enabled)?
            .set_default("diagnostics.directory", diagnostics.directory)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
