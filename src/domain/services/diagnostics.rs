// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::models::page::PageClassification;
use crate::utils::errors::ExtractionGap;

/// 诊断错误类型
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "detail")]
pub enum FailureKind {
    /// 页面被拦截或抓取失败
    Classification(PageClassification),
    /// 字段提取失败
    Extraction(ExtractionGap),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureKind::Classification(c) => write!(f, "{}", c),
            FailureKind::Extraction(ExtractionGap::TitleNotFound) => write!(f, "title_not_found"),
            FailureKind::Extraction(ExtractionGap::PriceNotFound) => write!(f, "price_not_found"),
        }
    }
}

/// 诊断事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// 出问题的页面URL
    pub url: String,
    /// 失败类型
    pub kind: FailureKind,
    /// 页面内容
    pub markup: String,
}

impl DiagnosticEvent {
    pub fn new(url: impl Into<String>, kind: FailureKind, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            markup: markup.into(),
        }
    }
}

/// 诊断收集器特质
///
/// 编排器在分类失败或字段提取失败时调用；收集失败不影响爬取结果
#[async_trait]
pub trait DiagnosticsCollector: Send + Sync {
    /// 记录一次失败
    async fn record(&self, event: DiagnosticEvent) -> Result<(), DiagnosticsError>;
}

/// 不做任何记录
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

#[async_trait]
impl DiagnosticsCollector for NoopDiagnostics {
    async fn record(&self, _event: DiagnosticEvent) -> Result<(), DiagnosticsError> {
        Ok(())
    }
}

/// 内存收集器
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录事件的快照
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl DiagnosticsCollector for MemoryDiagnostics {
    async fn record(&self, event: DiagnosticEvent) -> Result<(), DiagnosticsError> {
        self.events.lock().push(event);
        Ok(())
    }
}
