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

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::models::identity::ClientIdentity;
use crate::domain::models::page::FetchResult;

/// 抓取请求
#[derive(Debug, Clone)]
pub struct FetchRequest<'a> {
    /// 目标URL
    pub url: &'a str,
    /// 客户端身份（User-Agent 与代理）
    pub identity: &'a ClientIdentity,
    /// 挂钟超时时间
    pub timeout: Duration,
    /// 响应体最大字节数
    pub max_bytes: usize,
}

/// 页面抓取器特质
///
/// 实现方不得向调用方返回错误：超时、网络失败和超大响应都编码在 `FetchResult.error` 中。
/// 非 2xx 状态码不视为失败。实现内部不做重试。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 执行抓取
    async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult;

    /// 抓取器名称
    fn name(&self) -> &'static str;
}
