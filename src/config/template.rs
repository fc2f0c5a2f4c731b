use std::fs;
use std::path::Path;

use serde_json::json;

use crate::Result;
use crate::config::types::TestConfig;
use crate::template::Generator;

/// 示例配置：覆盖全部生成器的多路由模板
pub fn sample_config() -> Result<TestConfig> {
    let value = json!({
        "baseUrl": "https://api.example.com",
        "globalHeaders": {
            "User-Agent": concat!("rupress/", env!("CARGO_PKG_VERSION"))
        },
        "routes": [
            {
                "name": "Get User Profile",
                "url": "/users/{id}",
                "method": "GET",
                "headers": {
                    "Authorization": "Bearer YOUR_TOKEN",
                    "X-Request-ID": "$generate_uuid()"
                },
                "params": {
                    "include": "profile,preferences"
                },
                "urlParams": {
                    "id": "123456"
                }
            },
            {
                "name": "Create User",
                "url": "/users",
                "method": "POST",
                "headers": {
                    "Content-Type": "application/json",
                    "Authorization": "Bearer YOUR_TOKEN",
                    "X-Request-ID": "$generate_uuid()"
                },
                "body": {
                    "username": "$generate_text(min_words=1, max_words=2)",
                    "email": "$generate_email()",
                    "age": "$generate_number(min_val=18, max_val=90)",
                    "profile": {
                        "fullName": "$generate_text(min_words=2, max_words=3)",
                        "bio": "$generate_paragraph()",
                        "phone": "$generate_phone()",
                        "birthdate": "$generate_date(start_date=\"1950-01-01\", end_date=\"2005-12-31\")"
                    },
                    "preferences": {
                        "newsletter": "$generate_boolean()",
                        "theme": "$from_options([\"light\", \"dark\", \"system\"])"
                    }
                }
            },
            {
                "name": "Update User",
                "url": "/users/{id}",
                "method": "PUT",
                "headers": {
                    "Content-Type": "application/json",
                    "Authorization": "Bearer YOUR_TOKEN"
                },
                "urlParams": {
                    "id": "$generate_uuid()"
                },
                "body": {
                    "profile": {
                        "fullName": "$generate_text(min_words=2, max_words=3)",
                        "bio": "$generate_paragraph(min_sentences=1, max_sentences=3)"
                    }
                }
            }
        ]
    });

    Ok(serde_json::from_value(value)?)
}

/// 写出示例配置文件
pub fn save_config_template<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = sample_config()?;
    let content = serde_json::to_string_pretty(&config)?;
    fs::write(path, content)?;
    Ok(())
}

/// 占位符帮助信息，每个生成器一行
pub fn generator_help() -> String {
    Generator::ALL
        .iter()
        .map(|g| format!("  {}", g.usage()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_is_valid() {
        let mut config = sample_config().unwrap();
        ConfigLoader::validate(&mut config).unwrap();
        assert_eq!(config.routes.len(), 3);
    }

    #[test]
    fn test_saved_template_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api-config.json");
        save_config_template(&path).unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config, sample_config().unwrap());
    }

    #[test]
    fn test_generator_help_lists_all() {
        let help = generator_help();
        for generator in Generator::ALL {
            assert!(help.contains(generator.name()));
        }
    }
}
