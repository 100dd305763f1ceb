// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use crate::domain::models::identity::ClientIdentity;

/// 内置的真实浏览器 User-Agent（桌面 + 移动端）
pub const BROWSER_USER_AGENTS: &[&str] = &[
    // Desktop
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    // Mobile
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Mobile Safari/537.36",
];

/// 身份轮换器
///
/// 给定固定的池和索引，结果是确定的（`index mod poolSize`），便于复现测试。
/// User-Agent 池与代理池独立轮换；池为空时返回默认身份而不是失败。
#[derive(Debug, Clone, Default)]
pub struct IdentityRotator {
    user_agents: Vec<String>,
    proxies: Vec<String>,
    rotate: bool,
}

impl IdentityRotator {
    pub fn new(user_agents: Vec<String>, proxies: Vec<String>) -> Self {
        Self {
            user_agents,
            proxies,
            rotate: true,
        }
    }

    /// 根据配置创建轮换器，未配置 User-Agent 池时使用内置浏览器列表
    pub fn from_settings(settings: &ScraperSettings) -> Self {
        let user_agents = if settings.user_agent_pool.is_empty() {
            BROWSER_USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
        } else {
            settings.user_agent_pool.clone()
        };

        Self {
            user_agents,
            proxies: settings.proxy_pool.clone(),
            rotate: settings.rotate_identity_per_category,
        }
    }

    /// 关闭轮换后，所有爬取单元都使用索引 0 的身份
    pub fn with_rotation(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    /// 获取指定索引的身份
    pub fn next(&self, index: usize) -> ClientIdentity {
        let index = if self.rotate { index } else { 0 };
        let defaults = ClientIdentity::default();

        let user_agent = pick(&self.user_agents, index)
            .cloned()
            .unwrap_or(defaults.user_agent);
        let proxy = pick(&self.proxies, index).cloned();

        ClientIdentity { user_agent, proxy }
    }

    pub fn pool_size(&self) -> usize {
        self.user_agents.len()
    }
}

fn pick<T>(pool: &[T], index: usize) -> Option<&T> {
    if pool.is_empty() {
        None
    } else {
        pool.get(index % pool.len())
    }
}
