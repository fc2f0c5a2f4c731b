use rand::SeedableRng;
use rand::rngs::StdRng;
use rupress::config::template::save_config_template;
use rupress::config::ConfigLoader;
use rupress::http::RequestBuilder;
use rupress::http::types::Method;
use rupress::RupressError;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// TOML 配置文件加载
#[test]
fn test_load_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("api.toml");
    fs::write(
        &config_file,
        r#"
baseUrl = "http://localhost:3000"

[globalHeaders]
"User-Agent" = "rupress-test"

[[routes]]
name = "Search"
url = "/search"
[routes.params]
q = "$from_options([\"rust\", \"tokio\"])"

[[routes]]
name = "Create"
url = "/items/{id}"
method = "POST"
[routes.urlParams]
id = "$generate_number(min_val=1, max_val=9)"
[routes.body]
title = "$generate_text(min_words=1, max_words=3)"
tags = ["fixed", "$generate_uuid()"]
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_path(&config_file).unwrap();
    assert_eq!(config.routes.len(), 2);
    assert_eq!(config.routes[1].method, Method::Post);
    assert_eq!(config.global.global_headers["User-Agent"], "rupress-test");

    let route = config.route("Create").unwrap();
    let request = RequestBuilder::build(route, &config.global, &mut StdRng::seed_from_u64(5)).unwrap();
    let segment = request.url.path().trim_start_matches("/items/").to_string();
    let id: i64 = segment.parse().unwrap();
    assert!((1..=9).contains(&id));
    assert_eq!(request.headers.get("user-agent").unwrap(), "rupress-test");

    let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["tags"][0], "fixed");
    assert_eq!(body["tags"][1].as_str().unwrap().len(), 36);
}

#[test]
fn test_invalid_placeholder_fails_at_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("api.json");
    fs::write(
        &config_file,
        r#"{"routes": [{"name": "bad", "url": "/x", "params": {"n": "$generate_number(min_val=\"a\")"}}]}"#,
    )
    .unwrap();

    let err = ConfigLoader::load_from_path(&config_file).unwrap_err();
    match err {
        RupressError::ConfigError(msg) => {
            assert!(msg.contains("Route 'bad'"));
            assert!(msg.contains("params.n"));
        }
        other => panic!("Expected ConfigError, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let err = ConfigLoader::load_from_path("/nonexistent/rupress.json").unwrap_err();
    assert!(matches!(err, RupressError::ConfigError(_)));
}

#[test]
fn test_template_builds_requests() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("api-config.json");
    save_config_template(&config_file).unwrap();

    let config = ConfigLoader::load_from_path(&config_file).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for route in &config.routes {
        let request = RequestBuilder::build(route, &config.global, &mut rng).unwrap();
        assert!(request.url.as_str().starts_with("https://api.example.com/users"));
        assert!(!request.url.path().contains('{'));
    }
}
