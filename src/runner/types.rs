use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::http::Response;
use crate::{Result, RupressError};

/// 一次运行的参数
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// 每个路由发送的请求数
    pub request_count: usize,

    /// 是否并发发送
    pub concurrent: bool,

    /// 并发池大小上限
    pub concurrency: usize,

    /// 单个请求的超时（含读取响应体）
    pub timeout: Duration,

    /// 详细模式：单请求并保留响应体
    pub detail: bool,

    /// 随机数种子，便于复现生成的数据
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            request_count: 10,
            concurrent: false,
            concurrency: 10,
            timeout: Duration::from_secs(30),
            detail: false,
            seed: None,
        }
    }
}

impl RunOptions {
    /// 校验参数组合
    ///
    /// 详细模式只允许单路由、单请求、非并发。
    pub fn validate(&self, route_count: usize) -> Result<()> {
        if self.request_count == 0 {
            return Err(RupressError::ConfigError(
                "Request count must be at least 1".to_string(),
            ));
        }
        if self.concurrent && self.concurrency == 0 {
            return Err(RupressError::ConfigError(
                "Concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(RupressError::ConfigError(
                "Timeout must be greater than zero".to_string(),
            ));
        }
        if self.detail {
            if self.concurrent {
                return Err(RupressError::ConfigError(
                    "Detail mode cannot be combined with concurrent mode".to_string(),
                ));
            }
            if self.request_count != 1 {
                return Err(RupressError::ConfigError(
                    "Detail mode requires exactly one request".to_string(),
                ));
            }
            if route_count != 1 {
                return Err(RupressError::ConfigError(format!(
                    "Detail mode requires exactly one route, got {}",
                    route_count
                )));
            }
        }
        Ok(())
    }

    /// 实际的并发池大小：不超过请求总数
    pub fn pool_size(&self) -> usize {
        self.concurrency.min(self.request_count).max(1)
    }
}

/// 单个请求失败的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Transport,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// 单次请求的结果
#[derive(Debug, Clone, Serialize)]
pub struct RequestOutcome {
    /// 发出顺序（从 1 开始）
    pub sequence: usize,

    /// 响应状态码，未完成时为 0
    pub status_code: u16,

    /// 发送到读完响应体的耗时
    pub duration_ms: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,

    /// 仅详细模式下保留
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<(String, String)>>,
}

impl RequestOutcome {
    pub fn completed(sequence: usize, status_code: u16, duration: Duration) -> Self {
        Self {
            sequence,
            status_code,
            duration_ms: duration.as_nanos() as f64 / 1_000_000.0,
            error: None,
            response_body: None,
            response_headers: None,
        }
    }

    pub fn failed(
        sequence: usize,
        kind: ErrorKind,
        message: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            sequence,
            status_code: 0,
            duration_ms: duration.as_nanos() as f64 / 1_000_000.0,
            error: Some(OutcomeError {
                kind,
                message: message.into(),
            }),
            response_body: None,
            response_headers: None,
        }
    }

    /// 附带完整响应内容（详细模式）
    pub fn with_response(mut self, response: &Response) -> Self {
        self.response_headers = Some(response.header_pairs());
        self.response_body = Some(response.body.clone());
        self
    }

    /// 无传输错误且状态码在 200–399
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..400).contains(&self.status_code)
    }

    pub fn is_timeout(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.kind == ErrorKind::Timeout)
    }
}

/// 成功请求的耗时统计（毫秒）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// 单个路由的汇总报告
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub route_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub total_requests: usize,
    pub success_count: usize,
    pub failure_count: usize,

    /// 已完成响应的状态码分布
    pub status_codes: BTreeMap<u16, usize>,

    /// 传输错误与超时的数量
    pub failed: usize,

    /// 其中超时的数量
    pub timeouts: usize,

    pub timing: Option<TimingStats>,

    /// 路由被中止时的原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,

    pub outcomes: Vec<RequestOutcome>,
}

impl RouteReport {
    /// 成功率（百分比）
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.success_count as f64 / self.total_requests as f64 * 100.0
    }

    pub fn with_target(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.url = Some(url.into());
        self
    }

    pub fn with_abort(mut self, reason: impl Into<String>) -> Self {
        self.aborted = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RunOptions::default();
        assert_eq!(options.request_count, 10);
        assert_eq!(options.concurrency, 10);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.validate(3).is_ok());
    }

    #[test]
    fn test_pool_size_capped_by_request_count() {
        let options = RunOptions {
            request_count: 3,
            concurrency: 10,
            ..Default::default()
        };
        assert_eq!(options.pool_size(), 3);

        let options = RunOptions {
            request_count: 100,
            concurrency: 8,
            ..Default::default()
        };
        assert_eq!(options.pool_size(), 8);
    }

    #[test]
    fn test_detail_mode_restrictions() {
        let detail = RunOptions {
            request_count: 1,
            detail: true,
            ..Default::default()
        };
        assert!(detail.validate(1).is_ok());
        assert!(detail.validate(2).is_err());

        let many = RunOptions {
            request_count: 5,
            ..detail.clone()
        };
        assert!(many.validate(1).is_err());

        let concurrent = RunOptions {
            concurrent: true,
            ..detail
        };
        assert!(concurrent.validate(1).is_err());
    }

    #[test]
    fn test_zero_requests_rejected() {
        let options = RunOptions {
            request_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(1),
            Err(RupressError::ConfigError(_))
        ));
    }

    #[test]
    fn test_outcome_success_classification() {
        let ms = Duration::from_millis(5);
        assert!(RequestOutcome::completed(1, 200, ms).is_success());
        assert!(RequestOutcome::completed(1, 302, ms).is_success());
        assert!(!RequestOutcome::completed(1, 404, ms).is_success());

        let timeout = RequestOutcome::failed(1, ErrorKind::Timeout, "timed out", ms);
        assert!(!timeout.is_success());
        assert!(timeout.is_timeout());
        assert_eq!(timeout.status_code, 0);
    }

    #[test]
    fn test_outcome_serializes_error_kind() {
        let outcome =
            RequestOutcome::failed(3, ErrorKind::Transport, "connection refused", Duration::ZERO);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["error"]["kind"], "transport");
        assert!(value.get("response_body").is_none());
    }
}
