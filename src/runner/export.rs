use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::Result;
use crate::runner::types::RouteReport;

/// 导出文件的顶层结构
#[derive(Debug, Serialize)]
pub struct ResultsFile<'a> {
    pub timestamp: DateTime<Utc>,
    pub total_routes_tested: usize,
    pub routes: &'a [RouteReport],
}

impl<'a> ResultsFile<'a> {
    pub fn new(routes: &'a [RouteReport]) -> Self {
        Self {
            timestamp: Utc::now(),
            total_routes_tested: routes.len(),
            routes,
        }
    }
}

/// 将所有路由报告写入 JSON 文件
pub fn save_results<P: AsRef<Path>>(path: P, reports: &[RouteReport]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(&ResultsFile::new(reports))?;
    fs::write(path, content)?;

    info!(path = %path.display(), routes = reports.len(), "Results saved");
    Ok(())
}
