use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::types::{RouteSpec, TestConfig, value_to_string};
use crate::template::TemplateResolver;
use crate::{Result, RupressError};

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从指定路径加载并校验配置
    ///
    /// `.toml` 结尾按 TOML 解析，其余按 JSON 解析。
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<TestConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RupressError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::parse_toml(&content)?
        } else {
            Self::parse_json(&content)?
        };

        debug!(
            path = %path.display(),
            routes = config.routes.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn parse_json(content: &str) -> Result<TestConfig> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn parse_toml(content: &str) -> Result<TestConfig> {
        let value: Value = toml::from_str(content)?;
        Self::from_value(value)
    }

    /// 支持两种格式：
    /// 1. 多路由: `{ "routes": [...], "baseUrl": ..., "globalHeaders": ... }`
    /// 2. 单路由: 顶层直接是一个带 `url` 的路由
    pub fn from_value(value: Value) -> Result<TestConfig> {
        let Value::Object(map) = &value else {
            return Err(RupressError::ConfigError(
                "Config must be an object".to_string(),
            ));
        };

        let mut config = if map.contains_key("routes") {
            serde_json::from_value::<TestConfig>(value)?
        } else if map.contains_key("url") {
            let route: RouteSpec = serde_json::from_value(value)?;
            TestConfig::new(Default::default(), vec![route])
        } else {
            return Err(RupressError::ConfigError(
                "Config file must contain 'url' field or 'routes' array".to_string(),
            ));
        };

        Self::validate(&mut config)?;
        Ok(config)
    }

    /// 校验配置并补全缺省的路由名
    pub fn validate(config: &mut TestConfig) -> Result<()> {
        if config.routes.is_empty() {
            return Err(RupressError::ConfigError(
                "No routes defined in configuration".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (index, route) in config.routes.iter_mut().enumerate() {
            if route.name.trim().is_empty() {
                route.name = format!("Route {}", index + 1);
            }
            if !seen.insert(route.name.clone()) {
                return Err(RupressError::ConfigError(format!(
                    "Duplicate route name '{}'",
                    route.name
                )));
            }
            if route.url.trim().is_empty() {
                return Err(RupressError::ConfigError(format!(
                    "Route '{}' has an empty url",
                    route.name
                )));
            }
            route.validate_templates().map_err(|e| {
                RupressError::ConfigError(format!("Route '{}': {}", route.name, e))
            })?;
        }

        for (key, value) in &config.global.global_headers {
            TemplateResolver::validate(
                &Value::String(value.clone()),
                &format!("globalHeaders.{}", key),
            )
            .map_err(|e| RupressError::ConfigError(e.to_string()))?;
        }

        Ok(())
    }

    /// 解析 CLI 传入的 JSON 对象参数（--headers / --params）
    pub fn parse_json_map(flag: &str, s: &str) -> Result<BTreeMap<String, String>> {
        let value: Value = serde_json::from_str(s).map_err(|e| {
            RupressError::ConfigError(format!("Invalid JSON format in {}: {}", flag, e))
        })?;
        let Value::Object(map) = value else {
            return Err(RupressError::ConfigError(format!(
                "{} must be a JSON object",
                flag
            )));
        };

        Ok(map
            .into_iter()
            .map(|(k, v)| (k, value_to_string(v)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::types::Method;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_path_json() {
        let config_content = r#"{
  "baseUrl": "http://localhost:8080",
  "routes": [
    {"name": "list", "url": "/items"},
    {"name": "create", "url": "/items", "method": "post", "body": {"id": "$generate_uuid()"}}
  ]
}"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = ConfigLoader::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[1].method, Method::Post);
        assert_eq!(
            config.global.base_url.as_deref(),
            Some("http://localhost:8080")
        );
    }

    #[test]
    fn test_single_route_config() {
        let config = ConfigLoader::parse_json(r#"{"url": "http://example.com/ping"}"#).unwrap();
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].name, "Route 1");
    }

    #[test]
    fn test_scalar_map_values_become_strings() {
        let config = ConfigLoader::parse_json(
            r#"{
                "globalHeaders": {"X-Version": 2},
                "routes": [{
                    "name": "a",
                    "url": "http://x/a/{id}",
                    "params": {"page": 1, "limit": 10},
                    "headers": {"X-Flag": true},
                    "urlParams": {"id": 42}
                }]
            }"#,
        )
        .unwrap();
        let route = &config.routes[0];
        assert_eq!(route.params.get("page"), Some(&"1".to_string()));
        assert_eq!(route.params.get("limit"), Some(&"10".to_string()));
        assert_eq!(route.headers.get("X-Flag"), Some(&"true".to_string()));
        assert_eq!(route.url_params.get("id"), Some(&"42".to_string()));
        assert_eq!(config.global.global_headers.get("X-Version"), Some(&"2".to_string()));

        let config = ConfigLoader::parse_toml(
            r#"
            [[routes]]
            name = "t"
            url = "http://x/t"
            params = { page = 3, ratio = 0.5 }
            "#,
        )
        .unwrap();
        assert_eq!(config.routes[0].params.get("page"), Some(&"3".to_string()));
        assert_eq!(config.routes[0].params.get("ratio"), Some(&"0.5".to_string()));
    }

    #[test]
    fn test_missing_url_and_routes() {
        let err = ConfigLoader::parse_json(r#"{"method": "GET"}"#).unwrap_err();
        assert!(matches!(err, RupressError::ConfigError(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ConfigLoader::parse_json(
            r#"{"routes": [{"name": "a", "url": "/a"}, {"name": "a", "url": "/b"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate route name 'a'"));
    }

    #[test]
    fn test_unknown_generator_rejected_at_load() {
        let err = ConfigLoader::parse_json(
            r#"{"routes": [{"name": "a", "url": "/a", "body": {"x": "$generate_foo()"}}]}"#,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Route 'a'"));
        assert!(message.contains("generate_foo"));
        assert!(message.contains("body.x"));
    }

    #[test]
    fn test_invalid_method_rejected() {
        assert!(
            ConfigLoader::parse_json(r#"{"routes": [{"url": "/a", "method": "FETCH"}]}"#).is_err()
        );
    }

    #[test]
    fn test_parse_json_map() {
        let map = ConfigLoader::parse_json_map("--params", r#"{"page": 1, "q": "rust"}"#).unwrap();
        assert_eq!(map.get("page"), Some(&"1".to_string()));
        assert_eq!(map.get("q"), Some(&"rust".to_string()));

        assert!(ConfigLoader::parse_json_map("--headers", "[1, 2]").is_err());
        assert!(ConfigLoader::parse_json_map("--headers", "{oops").is_err());
    }
}
