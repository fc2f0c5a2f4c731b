use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;

use rupress::config::{ConfigLoader, RouteSpec, TestConfig};
use rupress::runner::RunOptions;
use rupress::{Result, RupressError};

const DEFAULT_REQUESTS: usize = 10;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "HTTP load and functional testing with generated request data",
    long_about = None
)]
pub struct Cli {
    /// 配置文件路径（JSON 或 TOML）
    #[arg(short = 'f', long = "config", value_name = "FILE", conflicts_with = "url")]
    pub config: Option<PathBuf>,

    /// 生成示例配置文件后退出
    #[arg(long, value_name = "FILE")]
    pub create_template: Option<PathBuf>,

    /// 只运行指定名称的路由（可重复）
    #[arg(short = 'r', long = "route", value_name = "NAME")]
    pub routes: Vec<String>,

    /// 单路由模式的目标 URL
    #[arg(long)]
    pub url: Option<String>,

    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// JSON 对象形式的请求头
    #[arg(short = 'H', long, value_name = "JSON")]
    pub headers: Option<String>,

    /// JSON 请求体
    #[arg(short, long, value_name = "JSON", conflicts_with = "body_file")]
    pub body: Option<String>,

    /// JSON 对象形式的查询参数
    #[arg(short, long, value_name = "JSON")]
    pub params: Option<String>,

    /// 从文件读取 JSON 请求体
    #[arg(long, value_name = "FILE")]
    pub body_file: Option<PathBuf>,

    /// 每个路由的请求数（默认 10，详细模式下为 1）
    #[arg(short = 'n', long)]
    pub requests: Option<usize>,

    #[arg(short, long)]
    pub concurrent: bool,

    /// 并发池大小
    #[arg(long, default_value_t = 10)]
    pub concurrency: usize,

    /// 单个请求超时（秒）
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// 随机数种子
    #[arg(long)]
    pub seed: Option<u64>,

    /// 将结果保存为 JSON 文件
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// 发送单个请求并显示完整响应
    #[arg(short, long)]
    pub detail: bool,
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        let default_requests = if self.detail { 1 } else { DEFAULT_REQUESTS };
        RunOptions {
            request_count: self.requests.unwrap_or(default_requests),
            concurrent: self.concurrent,
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout),
            detail: self.detail,
            seed: self.seed,
        }
    }

    /// 从配置文件或命令行参数得到测试配置
    pub fn load_config(&self) -> Result<TestConfig> {
        if let Some(path) = &self.config {
            return ConfigLoader::load_from_path(path);
        }

        let Some(url) = &self.url else {
            return Err(RupressError::ConfigError(
                "Either --config or --url must be provided".to_string(),
            ));
        };

        let mut route = RouteSpec::new("", self.method.parse()?, url.as_str());
        if let Some(headers) = &self.headers {
            route.headers = ConfigLoader::parse_json_map("--headers", headers)?;
        }
        if let Some(params) = &self.params {
            route.params = ConfigLoader::parse_json_map("--params", params)?;
        }
        route.body = self.load_body()?;

        let mut config = TestConfig::new(Default::default(), vec![route]);
        ConfigLoader::validate(&mut config)?;
        Ok(config)
    }

    fn load_body(&self) -> Result<Option<Value>> {
        let raw = match (&self.body, &self.body_file) {
            (Some(body), _) => body.clone(),
            (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
                RupressError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
            })?,
            (None, None) => return Ok(None),
        };

        let body = serde_json::from_str(&raw)
            .map_err(|e| RupressError::ConfigError(format!("Invalid JSON body: {}", e)))?;
        Ok(Some(body))
    }
}
