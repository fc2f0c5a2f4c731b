use rand::Rng;
use serde_json::Value;

use crate::config::{GlobalConfig, RouteSpec};
use crate::http::request::Request;
use crate::http::types::join_url;
use crate::template::TemplateResolver;
use crate::{Result, RupressError};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 根据路由定义构建具体请求
///
/// 每次调用都会重新解析占位符，因此每个请求携带独立生成的数据。
/// 不做任何网络 I/O，失败时不会修改路由定义。
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn build<R: Rng>(route: &RouteSpec, global: &GlobalConfig, rng: &mut R) -> Result<Request> {
        // 1. URL 路径参数 {name}
        let mut route_url = route.url.clone();
        for (name, value) in &route.url_params {
            let value = TemplateResolver::resolve_text(value, &format!("urlParams.{}", name), rng)?;
            route_url = route_url.replace(&format!("{{{}}}", name), &value);
        }

        let url = join_url(global.base_url.as_deref(), &route_url)?;
        let mut request = Request::from_url(route.method, url);

        // 2. 查询参数
        for (key, value) in &route.params {
            let value = TemplateResolver::resolve_text(value, &format!("params.{}", key), rng)?;
            request = request.with_query(key, &value);
        }

        // 3. Header：先全局，后路由（同名时路由覆盖）
        for (key, value) in &global.global_headers {
            let value =
                TemplateResolver::resolve_text(value, &format!("globalHeaders.{}", key), rng)?;
            request.insert_header(key, &value)?;
        }
        for (key, value) in &route.headers {
            let value = TemplateResolver::resolve_text(value, &format!("headers.{}", key), rng)?;
            request.insert_header(key, &value)?;
        }

        // 4. 请求体
        match &route.body {
            None | Some(Value::Null) => Ok(request),
            Some(body) => {
                let resolved = TemplateResolver::resolve(body, rng)?;
                Self::attach_body(request, &resolved)
            }
        }
    }

    /// 按 Content-Type 序列化请求体，未指定时使用 JSON
    fn attach_body(request: Request, body: &Value) -> Result<Request> {
        let content_type = request
            .content_type()
            .map(|ct| ct.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with(FORM_CONTENT_TYPE) {
            let Value::Object(fields) = body else {
                return Err(RupressError::ConfigError(
                    "form-encoded body must be an object".to_string(),
                ));
            };
            let mut form = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in fields {
                form.append_pair(key, &value_to_text(value));
            }
            Ok(request.with_text(&form.finish()))
        } else if content_type.starts_with("text/") {
            Ok(request.with_text(&value_to_text(body)))
        } else {
            request.with_json(body)
        }
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
