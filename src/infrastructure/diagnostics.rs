// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::settings::DiagnosticsSettings;
use crate::domain::services::diagnostics::{
    DiagnosticEvent, DiagnosticsCollector, DiagnosticsError, NoopDiagnostics,
};

/// 本地目录诊断收集器
///
/// 只保存第一次失败的页面内容，后续失败忽略
pub struct FileDiagnostics {
    directory: PathBuf,
    saved: AtomicBool,
}

impl FileDiagnostics {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            saved: AtomicBool::new(false),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_path(&self, event: &DiagnosticEvent) -> PathBuf {
        let file_name = format!(
            "failed_{}_{}.html",
            event.kind,
            Utc::now().format("%Y%m%dT%H%M%S%.3f")
        );
        self.directory.join(file_name)
    }
}

#[async_trait]
impl DiagnosticsCollector for FileDiagnostics {
    async fn record(&self, event: DiagnosticEvent) -> Result<(), DiagnosticsError> {
        if self
            .saved
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        let path = self.file_path(&event);
        let written = async {
            fs::create_dir_all(&self.directory).await?;
            let mut file = fs::File::create(&path).await?;
            file.write_all(format!("<!-- url: {} kind: {} -->\n", event.url, event.kind).as_bytes())
                .await?;
            file.write_all(event.markup.as_bytes()).await?;
            file.flush().await?;
            Ok::<(), std::io::Error>(())
        }
        .await;

        match written {
            Ok(()) => {
                info!(path = %path.display(), url = %event.url, "Saved failed page for inspection");
                Ok(())
            }
            Err(e) => {
                // Allow a later failure to try again
                self.saved.store(false, Ordering::SeqCst);
                Err(DiagnosticsError::Io(e))
            }
        }
    }
}

/// 诊断收集器工厂函数
pub fn create_diagnostics_collector(settings: &DiagnosticsSettings) -> Arc<dyn DiagnosticsCollector> {
    if settings.enabled {
        Arc::new(FileDiagnostics::new(&settings.directory))
    } else {
        Arc::new(NoopDiagnostics)
    }
}
