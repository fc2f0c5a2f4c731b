use thiserror::Error;

use crate::runner::types::RequestOutcome;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum RupressError {
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("无效的 URL: {0}")]
    InvalidUrl(String),

    #[error("无效的 Header: {0}")]
    InvalidHeader(String),

    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),

    /// 构建请求失败，路由剩余的请求全部中止
    ///
    /// `completed` 保存中止前已经完成的请求结果。
    #[error("路由 '{route}' 已中止: {source}")]
    RouteAborted {
        route: String,
        #[source]
        source: Box<RupressError>,
        completed: Vec<RequestOutcome>,
    },

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl RupressError {
    /// 将构建错误包装为路由级别的中止错误
    pub fn abort_route(
        route: impl Into<String>,
        source: RupressError,
        completed: Vec<RequestOutcome>,
    ) -> Self {
        RupressError::RouteAborted {
            route: route.into(),
            source: Box::new(source),
            completed,
        }
    }
}

impl From<anyhow::Error> for RupressError {
    fn from(err: anyhow::Error) -> Self {
        RupressError::Other(err.to_string())
    }
}

/// Result type for rupress crate
pub type Result<T> = std::result::Result<T, RupressError>;
