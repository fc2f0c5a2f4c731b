use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

use crate::template::generators::Generator;
use crate::template::parser::parse_placeholder;
use crate::template::types::{Placeholder, TemplateError};

/// 动态内容解析器
///
/// 递归遍历请求体，把 `$generator(args)` 形式的字符串叶子替换为生成值，
/// 其它叶子原样保留。随机源由调用方传入，每次请求都应重新解析。
pub struct TemplateResolver;

impl TemplateResolver {
    /// 解析请求体，字段路径以 `body` 为根
    pub fn resolve<R: Rng>(value: &Value, rng: &mut R) -> Result<Value, TemplateError> {
        Self::resolve_at(value, "body", rng)
    }

    /// 解析任意 JSON 值，`path` 为该值所在的字段路径
    pub fn resolve_at<R: Rng>(
        value: &Value,
        path: &str,
        rng: &mut R,
    ) -> Result<Value, TemplateError> {
        match value {
            Value::Object(map) => {
                let mut resolved = Map::with_capacity(map.len());
                for (key, item) in map {
                    let child = format!("{}.{}", path, key);
                    resolved.insert(key.clone(), Self::resolve_at(item, &child, rng)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Self::resolve_at(item, &format!("{}[{}]", path, i), rng))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::String(text) => Self::resolve_str(text, path, rng),
            other => Ok(other.clone()),
        }
    }

    /// 解析单个字符串字段；非占位符原样返回
    pub fn resolve_str<R: Rng>(
        text: &str,
        path: &str,
        rng: &mut R,
    ) -> Result<Value, TemplateError> {
        match parse_placeholder(text).map_err(|e| e.at(path))? {
            Some(placeholder) => Self::expand(&placeholder, path, rng),
            None => Ok(Value::String(text.to_string())),
        }
    }

    /// 解析字符串字段并转为文本（用于 header / query / URL 参数）
    pub fn resolve_text<R: Rng>(
        text: &str,
        path: &str,
        rng: &mut R,
    ) -> Result<String, TemplateError> {
        Ok(match Self::resolve_str(text, path, rng)? {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// 按注册表调用生成器
    pub fn expand<R: Rng>(
        placeholder: &Placeholder,
        path: &str,
        rng: &mut R,
    ) -> Result<Value, TemplateError> {
        let generator: Generator = placeholder.name.parse().map_err(|e: TemplateError| e.at(path))?;
        generator
            .generate(&placeholder.args, rng)
            .map_err(|e| e.at(path))
    }

    /// 加载配置时的预检：用一次性的随机源试解析，
    /// 把未知生成器与非法参数在发请求前暴露出来
    pub fn validate(value: &Value, path: &str) -> Result<(), TemplateError> {
        let mut rng = StdRng::seed_from_u64(0);
        Self::resolve_at(value, path, &mut rng).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_resolve_nested_body() {
        let body = json!({
            "name": "$generate_text(min_words=1, max_words=1)",
            "age": "$generate_number(min_val=18, max_val=18)",
            "active": "$generate_boolean()",
            "tags": ["fixed", "$from_options([\"x\"])"],
            "profile": {"theme": "$from_options(options=[\"dark\"])", "count": 3, "none": null}
        });

        let resolved = TemplateResolver::resolve(&body, &mut rng()).unwrap();
        assert!(resolved["name"].is_string());
        assert_eq!(resolved["age"], json!(18));
        assert!(resolved["active"].is_boolean());
        assert_eq!(resolved["tags"], json!(["fixed", "x"]));
        assert_eq!(resolved["profile"]["theme"], json!("dark"));
        assert_eq!(resolved["profile"]["count"], json!(3));
        assert_eq!(resolved["profile"]["none"], Value::Null);
    }

    #[test]
    fn test_literal_leaves_unchanged() {
        let body = json!({"note": "costs $5", "plain": "hello", "n": 1.5});
        let resolved = TemplateResolver::resolve(&body, &mut rng()).unwrap();
        assert_eq!(resolved, body);
    }

    #[test]
    fn test_error_path_points_to_field() {
        let body = json!({"user": {"items": [1, "$generate_nothing()"]}});
        let err = TemplateResolver::resolve(&body, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownGenerator {
                path: "body.user.items[1]".to_string(),
                name: "generate_nothing".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_text_renders_numbers() {
        let text =
            TemplateResolver::resolve_text("$generate_number(min_val=4, max_val=4)", "params.n", &mut rng())
                .unwrap();
        assert_eq!(text, "4");
    }

    #[test]
    fn test_validate_reports_invalid_argument() {
        let body = json!({"theme": "$from_options([])"});
        let err = TemplateResolver::validate(&body, "body").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidArgument { ref path, .. } if path == "body.theme"));
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let body = json!({"id": "$generate_uuid()", "n": "$generate_number()"});
        let a = TemplateResolver::resolve(&body, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = TemplateResolver::resolve(&body, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
