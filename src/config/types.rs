use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::http::types::Method;
use crate::template::{TemplateError, TemplateResolver};

/// 单个路由的测试定义，加载后只读
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// 路由名称（配置内唯一，缺省时按序号生成）
    #[serde(default)]
    pub name: String,

    /// 可以是相对 base URL 的路径
    pub url: String,

    #[serde(default)]
    pub method: Method,

    #[serde(default, deserialize_with = "string_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// 查询参数
    #[serde(default, deserialize_with = "string_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,

    /// URL 中 `{name}` 片段的替换值
    #[serde(default, deserialize_with = "string_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub url_params: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RouteSpec {
    pub fn new(name: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_url_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.url_params.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// 预检所有可能包含占位符的字段
    pub fn validate_templates(&self) -> Result<(), TemplateError> {
        validate_map(&self.headers, "headers")?;
        validate_map(&self.params, "params")?;
        validate_map(&self.url_params, "urlParams")?;
        if let Some(body) = &self.body {
            TemplateResolver::validate(body, "body")?;
        }
        Ok(())
    }
}

fn validate_map(map: &BTreeMap<String, String>, prefix: &str) -> Result<(), TemplateError> {
    for (key, value) in map {
        TemplateResolver::validate(&Value::String(value.clone()), &format!("{}.{}", prefix, key))?;
    }
    Ok(())
}

/// 字符串原样保留，其它 JSON 值取其文本形式
pub(crate) fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// 允许配置中的 map 值写成数字或布尔值
fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(map
        .into_iter()
        .map(|(k, v)| (k, value_to_string(v)))
        .collect())
}

/// 所有路由共享的设置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, deserialize_with = "string_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub global_headers: BTreeMap<String, String>,
}

impl GlobalConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_headers.insert(key.into(), value.into());
        self
    }
}

/// 完整的测试配置文件
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestConfig {
    #[serde(flatten)]
    pub global: GlobalConfig,

    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

impl TestConfig {
    pub fn new(global: GlobalConfig, routes: Vec<RouteSpec>) -> Self {
        Self { global, routes }
    }

    /// 按名称筛选路由；`names` 为空时返回全部
    pub fn select_routes(&self, names: &[String]) -> Vec<&RouteSpec> {
        if names.is_empty() {
            return self.routes.iter().collect();
        }
        self.routes
            .iter()
            .filter(|route| names.iter().any(|n| n == &route.name))
            .collect()
    }

    pub fn route(&self, name: &str) -> Option<&RouteSpec> {
        self.routes.iter().find(|route| route.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_deserialize_camel_case() {
        let route: RouteSpec = serde_json::from_value(json!({
            "name": "Get User",
            "url": "/users/{id}",
            "urlParams": {"id": "42"},
            "params": {"include": "profile"}
        }))
        .unwrap();

        assert_eq!(route.method, Method::Get);
        assert_eq!(route.url_params.get("id"), Some(&"42".to_string()));
        assert_eq!(route.params.get("include"), Some(&"profile".to_string()));
        assert!(route.body.is_none());
    }

    #[test]
    fn test_config_flattens_global() {
        let config: TestConfig = serde_json::from_value(json!({
            "baseUrl": "https://api.example.com",
            "globalHeaders": {"User-Agent": "rupress"},
            "routes": [{"name": "a", "url": "/a"}]
        }))
        .unwrap();

        assert_eq!(
            config.global.base_url.as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(config.global.global_headers.len(), 1);
        assert_eq!(config.routes.len(), 1);
    }

    #[test]
    fn test_select_routes() {
        let config = TestConfig::new(
            GlobalConfig::default(),
            vec![
                RouteSpec::new("a", Method::Get, "/a"),
                RouteSpec::new("b", Method::Get, "/b"),
            ],
        );

        assert_eq!(config.select_routes(&[]).len(), 2);
        let selected = config.select_routes(&["b".to_string()]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "b");
        assert!(config.route("c").is_none());
    }

    #[test]
    fn test_validate_templates_reports_header_path() {
        let route = RouteSpec::new("a", Method::Get, "/a").with_header("X-Id", "$generate_guid()");
        let err = route.validate_templates().unwrap_err();
        assert_eq!(err.path(), "headers.X-Id");
    }
}
