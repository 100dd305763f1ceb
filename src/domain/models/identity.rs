// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 默认桌面浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// 客户端身份
///
/// 每个爬取单元（一个类目任务或一个详情批次）选定一次，之后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 代理地址（可选）
    pub proxy: Option<String>,
}

impl ClientIdentity {
    pub fn new(user_agent: impl Into<String>, proxy: Option<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            proxy,
        }
    }
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}
