use std::collections::BTreeMap;

use crate::runner::types::{RequestOutcome, RouteReport, TimingStats};

/// 将一个路由的所有请求结果汇总为报告
///
/// 纯函数：不做 I/O，也不修改结果顺序。
pub fn aggregate(route_name: impl Into<String>, outcomes: Vec<RequestOutcome>) -> RouteReport {
    let mut status_codes = BTreeMap::new();
    let mut failed = 0;
    let mut timeouts = 0;
    let mut durations = Vec::new();

    for outcome in &outcomes {
        if outcome.error.is_some() {
            failed += 1;
            if outcome.is_timeout() {
                timeouts += 1;
            }
            continue;
        }

        *status_codes.entry(outcome.status_code).or_insert(0) += 1;
        if outcome.is_success() {
            durations.push(outcome.duration_ms);
        }
    }

    let success_count = durations.len();
    RouteReport {
        route_name: route_name.into(),
        method: None,
        url: None,
        total_requests: outcomes.len(),
        success_count,
        failure_count: outcomes.len() - success_count,
        status_codes,
        failed,
        timeouts,
        timing: timing_stats(durations),
        aborted: None,
        outcomes,
    }
}

/// 计算耗时统计，空集合时返回 None
pub fn timing_stats(mut durations: Vec<f64>) -> Option<TimingStats> {
    if durations.is_empty() {
        return None;
    }
    durations.sort_by(f64::total_cmp);

    let sum: f64 = durations.iter().sum();
    Some(TimingStats {
        min: durations[0],
        max: durations[durations.len() - 1],
        mean: sum / durations.len() as f64,
        median: percentile(&durations, 50.0),
        p90: percentile(&durations, 90.0),
        p95: percentile(&durations, 95.0),
        p99: percentile(&durations, 99.0),
    })
}

/// 最近秩百分位：rank = ceil(p/100 · n)，取第 rank 个（至少为 1）
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    let index = rank.max(1).min(sorted.len()) - 1;
    sorted[index]
}
