use crate::Result;
use crate::http::request::Request;
use crate::http::response::Response;

/// 共享的 HTTP 客户端，clone 后共用同一个连接池
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!("rupress/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { inner })
    }

    /// 发送请求并读完整个响应体
    ///
    /// `capture_body` 为 false 时响应体读取后即丢弃，只保留状态码与响应头。
    pub async fn execute(&self, request: Request, capture_body: bool) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = if capture_body {
            response.text().await?
        } else {
            response.bytes().await?;
            String::new()
        };
        Ok(Response::new(status, headers, body))
    }
}
