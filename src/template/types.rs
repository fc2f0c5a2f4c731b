use std::fmt;

use serde_json::Value;

/// 模板解析 / 生成错误
///
/// `path` 为出错字段的路径，如 `body.profile.email`、`headers.X-Request-ID`。
/// 解析阶段尚不知道路径，由 [`TemplateError::at`] 在解析器外部补上。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid placeholder syntax at '{path}': {message} in `{snippet}`")]
    Syntax {
        path: String,
        snippet: String,
        message: String,
    },

    #[error("Unknown generator '{name}' at '{path}'")]
    UnknownGenerator { path: String, name: String },

    #[error("Invalid argument for {generator} at '{path}': {message}")]
    InvalidArgument {
        path: String,
        generator: String,
        message: String,
    },
}

impl TemplateError {
    pub fn syntax(snippet: &str, message: impl Into<String>) -> Self {
        TemplateError::Syntax {
            path: String::new(),
            snippet: snippet.to_string(),
            message: message.into(),
        }
    }

    pub fn unknown_generator(name: &str) -> Self {
        TemplateError::UnknownGenerator {
            path: String::new(),
            name: name.to_string(),
        }
    }

    pub fn invalid_argument(generator: &str, message: impl Into<String>) -> Self {
        TemplateError::InvalidArgument {
            path: String::new(),
            generator: generator.to_string(),
            message: message.into(),
        }
    }

    /// 设置出错字段路径
    pub fn at(mut self, field_path: &str) -> Self {
        match &mut self {
            TemplateError::Syntax { path, .. }
            | TemplateError::UnknownGenerator { path, .. }
            | TemplateError::InvalidArgument { path, .. } => {
                *path = field_path.to_string();
            }
        }
        self
    }

    /// 出错字段路径
    pub fn path(&self) -> &str {
        match self {
            TemplateError::Syntax { path, .. }
            | TemplateError::UnknownGenerator { path, .. }
            | TemplateError::InvalidArgument { path, .. } => path,
        }
    }
}

/// 占位符参数值
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<ArgValue>),
}

impl ArgValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::String(_) => "string",
            ArgValue::Integer(_) => "integer",
            ArgValue::Float(_) => "number",
            ArgValue::Bool(_) => "boolean",
            ArgValue::List(_) => "list",
        }
    }

    /// 转换为 JSON 值（from_options 直接把选项原样放进请求体）
    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::String(s) => Value::String(s.clone()),
            ArgValue::Integer(n) => Value::from(*n),
            ArgValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ArgValue::Bool(b) => Value::Bool(*b),
            ArgValue::List(items) => Value::Array(items.iter().map(ArgValue::to_json).collect()),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => write!(f, "{:?}", s),
            ArgValue::Integer(n) => write!(f, "{}", n),
            ArgValue::Float(n) => write!(f, "{}", n),
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// 单个参数：`key=value` 或位置参数 `value`
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: ArgValue,
}

impl Argument {
    pub fn named(name: impl Into<String>, value: ArgValue) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }

    pub fn positional(value: ArgValue) -> Self {
        Self { name: None, value }
    }
}

/// 解析后的占位符表达式 `$name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub name: String,
    pub args: Vec<Argument>,
}
