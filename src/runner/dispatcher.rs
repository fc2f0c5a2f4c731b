use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::config::{GlobalConfig, RouteSpec};
use crate::http::{Client, Request, RequestBuilder};
use crate::runner::types::{ErrorKind, RequestOutcome, RunOptions};
use crate::{Result, RupressError};

/// 按运行参数向单个路由发送一批请求
pub struct Dispatcher {
    client: Client,
    options: RunOptions,
}

impl Dispatcher {
    pub fn new(client: Client, options: RunOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// 发送 `request_count` 个请求，返回每个请求的结果
    ///
    /// 单个请求的失败作为结果记录；构建请求失败时中止整个路由，
    /// 返回 [`RupressError::RouteAborted`]，其中带有已完成的结果。
    pub async fn run(&self, route: &RouteSpec, global: &GlobalConfig) -> Result<Vec<RequestOutcome>> {
        info!(
            route = %route.name,
            requests = self.options.request_count,
            concurrent = self.options.concurrent,
            "Dispatching route"
        );

        if self.options.concurrent {
            self.run_concurrent(route, global).await
        } else {
            self.run_sequential(route, global).await
        }
    }

    /// 逐个发送，等待上一个完成后再发下一个；结果按发出顺序排列
    pub async fn run_sequential(
        &self,
        route: &RouteSpec,
        global: &GlobalConfig,
    ) -> Result<Vec<RequestOutcome>> {
        let mut rng = self.master_rng();
        let mut outcomes = Vec::with_capacity(self.options.request_count);

        for sequence in 1..=self.options.request_count {
            let request = match RequestBuilder::build(route, global, &mut rng) {
                Ok(request) => request,
                Err(e) => return Err(RupressError::abort_route(&route.name, e, outcomes)),
            };
            let outcome = execute(&self.client, request, sequence, self.options.timeout, false).await;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// 通过有界并发池发送；结果按完成顺序排列
    pub async fn run_concurrent(
        &self,
        route: &RouteSpec,
        global: &GlobalConfig,
    ) -> Result<Vec<RequestOutcome>> {
        let route = Arc::new(route.clone());
        let global = Arc::new(global.clone());
        let pool = Arc::new(Semaphore::new(self.options.pool_size()));
        let mut master = self.master_rng();

        let mut tasks: JoinSet<Result<RequestOutcome>> = JoinSet::new();
        let mut outcomes = Vec::with_capacity(self.options.request_count);

        debug!(pool_size = self.options.pool_size(), "Starting worker pool");

        for sequence in 1..=self.options.request_count {
            let permit = pool
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| RupressError::Other(e.to_string()))?;

            // 提前收集已完成的任务，尽早发现构建失败
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = collect(joined, &mut outcomes) {
                    tasks.abort_all();
                    return Err(RupressError::abort_route(&route.name, e, outcomes));
                }
            }

            let seed: u64 = master.random();
            let client = self.client.clone();
            let route = Arc::clone(&route);
            let global = Arc::clone(&global);
            let timeout = self.options.timeout;

            tasks.spawn(async move {
                let _permit = permit;
                let mut rng = StdRng::seed_from_u64(seed);
                let request = RequestBuilder::build(&route, &global, &mut rng)?;
                Ok(execute(&client, request, sequence, timeout, false).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = collect(joined, &mut outcomes) {
                tasks.abort_all();
                return Err(RupressError::abort_route(&route.name, e, outcomes));
            }
        }

        Ok(outcomes)
    }

    /// 详细模式：发送单个请求并保留响应头与响应体
    pub async fn run_detail(&self, route: &RouteSpec, global: &GlobalConfig) -> Result<RequestOutcome> {
        let mut rng = self.master_rng();
        let request = RequestBuilder::build(route, global, &mut rng)
            .map_err(|e| RupressError::abort_route(&route.name, e, Vec::new()))?;

        debug!(method = %request.method, url = %request.url, "Sending detail request");
        Ok(execute(&self.client, request, 1, self.options.timeout, true).await)
    }

    fn master_rng(&self) -> StdRng {
        match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// 收集一个已结束任务的结果；被取消的任务忽略
fn collect(
    joined: std::result::Result<Result<RequestOutcome>, JoinError>,
    outcomes: &mut Vec<RequestOutcome>,
) -> Result<()> {
    match joined {
        Ok(Ok(outcome)) => {
            outcomes.push(outcome);
            Ok(())
        }
        Ok(Err(e)) => Err(e),
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => Err(RupressError::Other(format!("request task panicked: {}", e))),
    }
}

/// 发送一个请求并记录结果，超时覆盖发送与读取响应体
pub async fn execute(
    client: &Client,
    request: Request,
    sequence: usize,
    timeout: Duration,
    capture: bool,
) -> RequestOutcome {
    let start = Instant::now();
    let result = tokio::time::timeout(timeout, client.execute(request, capture)).await;
    let elapsed = start.elapsed();

    match result {
        Ok(Ok(response)) => {
            debug!(
                sequence,
                status = response.status,
                duration_ms = elapsed.as_millis() as u64,
                "Request completed"
            );
            let outcome = RequestOutcome::completed(sequence, response.status, elapsed);
            if capture {
                outcome.with_response(&response)
            } else {
                outcome
            }
        }
        Ok(Err(RupressError::HttpError(e))) => {
            let kind = if e.is_timeout() {
                ErrorKind::Timeout
            } else {
                ErrorKind::Transport
            };
            let message = error_chain(&e);
            warn!(sequence, ?kind, error = %message, "Request failed");
            RequestOutcome::failed(sequence, kind, message, elapsed)
        }
        Ok(Err(e)) => {
            warn!(sequence, error = %e, "Request failed");
            RequestOutcome::failed(sequence, ErrorKind::Transport, e.to_string(), elapsed)
        }
        Err(_) => {
            warn!(sequence, "Request timed out");
            RequestOutcome::failed(
                sequence,
                ErrorKind::Timeout,
                format!("Request timed out after {:.1}s", timeout.as_secs_f64()),
                elapsed,
            )
        }
    }
}

/// 拼接错误及其所有底层原因
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
