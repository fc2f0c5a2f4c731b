use colored::*;

use crate::Result;
use crate::http::types::Status;
use crate::runner::types::{ErrorKind, RequestOutcome};

/// 详细模式下单个请求结果的展示
pub struct ResponseFormatter {
    color: bool,
    show_headers: bool,
    show_body: bool,
}

impl ResponseFormatter {
    pub fn new() -> Self {
        Self {
            color: true,
            show_headers: true,
            show_body: true,
        }
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    pub fn format(&self, outcome: &RequestOutcome) -> Result<String> {
        let mut output = Vec::new();

        if let Some(error) = &outcome.error {
            let label = match error.kind {
                ErrorKind::Timeout => "TIMEOUT",
                ErrorKind::Transport => "TRANSPORT ERROR",
            };
            output.push(self.paint(format!("{}: {}", label, error.message), |s| s.red().bold()));
            output.push(self.paint(format!("Time: {:.2}ms", outcome.duration_ms), |s| s.cyan()));
            return Ok(output.join("\n"));
        }

        // 非标准状态码（如 600+）照常显示，原因短语为 Unknown
        let status = Status::new(outcome.status_code).ok();
        let status_line = format!(
            "HTTP {} {}",
            outcome.status_code,
            status.map_or("Unknown", |s| s.reason_phrase())
        );
        output.push(self.paint(status_line, |s| match status {
            Some(status) if status.is_success() || status.is_redirect() => s.green().bold(),
            Some(status) if status.is_client_error() => s.yellow().bold(),
            _ => s.red().bold(),
        }));
        output.push(self.paint(format!("Time: {:.2}ms", outcome.duration_ms), |s| s.cyan()));

        if self.show_headers
            && let Some(headers) = &outcome.response_headers
        {
            output.push(String::new());
            output.push(self.paint("Headers:".to_string(), |s| s.blue().bold()));
            for (key, value) in headers {
                output.push(self.paint(format!("   {}: {}", key, value), |s| s.blue()));
            }
        }

        if self.show_body
            && let Some(body) = outcome.response_body.as_deref().filter(|b| !b.is_empty())
        {
            output.push(String::new());
            output.push(self.paint("Body:".to_string(), |s| s.blue().bold()));
            // 尝试格式化 JSON，失败则显示原始内容
            let formatted_body = self
                .try_format_json(body)
                .unwrap_or_else(|_| body.to_string());
            output.push(formatted_body);
        }

        Ok(output.join("\n"))
    }

    fn paint(&self, text: String, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(&text).to_string()
        } else {
            text
        }
    }

    /// 尝试将 body 格式化为漂亮的 JSON
    fn try_format_json(&self, body: &str) -> Result<String> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new()
    }
}
