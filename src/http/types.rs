use std::fmt;
use std::str::FromStr;

use crate::{Result, RupressError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl FromStr for Method {
    type Err = RupressError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(RupressError::ConfigError(format!(
                "Invalid HTTP method: {}",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = RupressError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// 默认 host，当 URL 中未指定 host 时使用
const DEFAULT_HOST: &str = "localhost";
/// 默认 scheme，当 URL 中未指定 scheme 时使用
const DEFAULT_SCHEME: &str = "http";

/// 补全简写形式的 URL
///
/// - ":3000" -> "http://localhost:3000"
/// - "localhost:3000/api" -> "http://localhost:3000/api"
/// - "https://:8080" -> "https://localhost:8080"
pub fn normalize_url(input: &str) -> String {
    let input = input.trim();

    if input.starts_with(':') {
        format!("{}://{}{}", DEFAULT_SCHEME, DEFAULT_HOST, input)
    } else if let Some(pos) = input.find("://") {
        let after_scheme = &input[pos + 3..];
        if after_scheme.starts_with(':') {
            format!("{}://{}{}", &input[..pos], DEFAULT_HOST, after_scheme)
        } else {
            input.to_string()
        }
    } else {
        format!("{}://{}", DEFAULT_SCHEME, input)
    }
}

/// 拼接 base URL 与路由 URL
///
/// 路由 URL 为绝对地址（带 scheme）时忽略 base。
pub fn join_url(base: Option<&str>, route_url: &str) -> Result<url::Url> {
    let route_url = route_url.trim();
    let target = match base.map(str::trim).filter(|b| !b.is_empty()) {
        Some(base) if !route_url.contains("://") => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            route_url.trim_start_matches('/')
        ),
        _ => route_url.to_string(),
    };

    if target.is_empty() {
        return Err(RupressError::InvalidUrl("URL is empty".to_string()));
    }

    url::Url::parse(&normalize_url(&target))
        .map_err(|e| RupressError::InvalidUrl(format!("{}: {}", target, e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Self(code))
        } else {
            Err(RupressError::Other(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_redirect(&self) -> bool {
        (300..=399).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..=499).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..=599).contains(&self.0)
    }

    pub fn reason_phrase(&self) -> &'static str {
        reqwest::StatusCode::from_u16(self.0)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!(" Patch ".parse::<Method>().unwrap(), Method::Patch);
        assert!("FETCH".parse::<Method>().is_err());
    }

    #[test]
    fn test_method_serde() {
        let method: Method = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(method, Method::Delete);
        assert_eq!(serde_json::to_string(&Method::Put).unwrap(), "\"PUT\"");
    }

    #[test]
    fn test_normalize_port_only() {
        assert_eq!(normalize_url(":8080/path"), "http://localhost:8080/path");
    }

    #[test]
    fn test_normalize_port_with_scheme() {
        assert_eq!(normalize_url("https://:8080"), "https://localhost:8080");
    }

    #[test]
    fn test_normalize_without_scheme() {
        assert_eq!(
            normalize_url("  127.0.0.1:8080/test "),
            "http://127.0.0.1:8080/test"
        );
        assert_eq!(
            normalize_url("https://example.com/a"),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_join_relative_route() {
        let url = join_url(Some("https://api.example.com/v1/"), "/users").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/users");

        let url = join_url(Some("https://api.example.com/v1"), "users").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/users");
    }

    #[test]
    fn test_join_absolute_route_overrides_base() {
        let url = join_url(Some("https://api.example.com"), "http://other.local:9000/x").unwrap();
        assert_eq!(url.as_str(), "http://other.local:9000/x");
    }

    #[test]
    fn test_join_without_base() {
        let url = join_url(None, "localhost:3000/api").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(3000));
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn test_join_empty_is_error() {
        assert!(matches!(join_url(None, "  "), Err(RupressError::InvalidUrl(_))));
    }

    #[test]
    fn test_status_classes() {
        let status = Status::new(302).unwrap();
        assert!(status.is_redirect());
        assert!(!status.is_success());
        assert_eq!(Status::new(404).unwrap().reason_phrase(), "Not Found");
        assert!(Status::new(42).is_err());
    }
}
