use reqwest::header::HeaderMap as Headers;

pub struct Response {
    /// 原始状态码，不做范围校验
    pub status: u16,
    pub headers: Headers,
    /// 仅在需要时读取为文本，批量压测时为空
    pub body: String,
}

impl Response {
    pub fn new(status: u16, headers: Headers, body: String) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 以 (name, value) 列表形式导出 header
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or("<invalid utf-8>").to_string(),
                )
            })
            .collect()
    }
}
