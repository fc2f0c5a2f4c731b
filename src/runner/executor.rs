use tracing::{info, warn};

use crate::config::{GlobalConfig, RouteSpec, TestConfig};
use crate::http::Client;
use crate::http::types::join_url;
use crate::runner::aggregator::aggregate;
use crate::runner::dispatcher::Dispatcher;
use crate::runner::types::{RequestOutcome, RouteReport, RunOptions};
use crate::{Result, RupressError};

/// 依次执行配置中选中的路由，每个路由产出一份报告
pub struct RouteRunner {
    dispatcher: Dispatcher,
}

impl RouteRunner {
    pub fn new(client: Client, options: RunOptions) -> Self {
        Self {
            dispatcher: Dispatcher::new(client, options),
        }
    }

    pub fn options(&self) -> &RunOptions {
        self.dispatcher.options()
    }

    /// 选出要执行的路由并校验运行参数
    pub fn select<'a>(&self, config: &'a TestConfig, names: &[String]) -> Result<Vec<&'a RouteSpec>> {
        let selected = config.select_routes(names);
        if selected.is_empty() {
            return Err(RupressError::ConfigError(format!(
                "No matching routes found: {}",
                names.join(", ")
            )));
        }
        self.options().validate(selected.len())?;
        Ok(selected)
    }

    /// 批量执行所有选中的路由
    pub async fn run_all(&self, config: &TestConfig, names: &[String]) -> Result<Vec<RouteReport>> {
        let routes = self.select(config, names)?;
        let mut reports = Vec::with_capacity(routes.len());

        for route in routes {
            reports.push(self.run_route(route, &config.global).await?);
        }

        Ok(reports)
    }

    /// 执行单个路由；构建失败时返回带中止说明的报告
    pub async fn run_route(&self, route: &RouteSpec, global: &GlobalConfig) -> Result<RouteReport> {
        let url = join_url(global.base_url.as_deref(), &route.url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| route.url.clone());

        let report = match self.dispatcher.run(route, global).await {
            Ok(outcomes) => aggregate(&route.name, outcomes),
            Err(RupressError::RouteAborted {
                route: name,
                source,
                completed,
            }) => {
                warn!(
                    route = %name,
                    completed = completed.len(),
                    error = %source,
                    "Route aborted"
                );
                aggregate(name, completed).with_abort(source.to_string())
            }
            Err(e) => return Err(e),
        };

        info!(
            route = %route.name,
            success = report.success_count,
            failures = report.failure_count,
            "Route finished"
        );
        Ok(report.with_target(route.method.as_str(), url))
    }

    /// 详细模式：对唯一选中的路由发送一个请求
    pub async fn run_detail(
        &self,
        config: &TestConfig,
        names: &[String],
    ) -> Result<(String, RequestOutcome)> {
        let routes = self.select(config, names)?;
        let route = routes[0];
        let outcome = self.dispatcher.run_detail(route, &config.global).await?;
        Ok((route.name.clone(), outcome))
    }
}
