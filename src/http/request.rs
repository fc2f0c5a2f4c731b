use reqwest::header::{CONTENT_TYPE, HeaderMap as Headers, HeaderName, HeaderValue};

use crate::http::types::Method;
use crate::{Result, RupressError};
use serde::Serialize;

/// 构建完成、可直接发送的请求
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: url::Url,
    pub headers: Headers,
    pub body: Option<String>,
}

impl Request {
    pub fn from_url(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// 插入 header，同名（不区分大小写）时覆盖
    pub fn insert_header(&mut self, key: &str, value: &str) -> Result<()> {
        let name: HeaderName = key
            .parse()
            .map_err(|_| RupressError::InvalidHeader(format!("invalid header name '{}'", key)))?;
        let value: HeaderValue = value.parse().map_err(|_| {
            RupressError::InvalidHeader(format!("invalid value for header '{}'", key))
        })?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.body = Some(text.to_owned());
        self
    }

    pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_string(data)?;
        if self.content_type().is_none() {
            self.insert_header("Content-Type", "application/json")?;
        }
        self.body = Some(json);
        Ok(self)
    }

    /// 追加查询参数（保留 URL 中已有的参数）
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}
