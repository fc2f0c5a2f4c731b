use std::sync::OnceLock;

use regex::Regex;

use crate::template::types::{ArgValue, Argument, Placeholder, TemplateError};

/// 解析占位符表达式
///
/// 支持的格式：
/// - `$generate_uuid` / `$generate_uuid()`
/// - `$generate_number(min_val=1, max_val=10)`
/// - `$generate_date(start_date="2024-01-01")`
/// - `$from_options(["light", "dark"])` (位置参数)
///
/// 返回 `Ok(None)` 表示这是普通字符串，应原样保留。
pub fn parse_placeholder(input: &str) -> Result<Option<Placeholder>, TemplateError> {
    static HEAD_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = HEAD_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\$([A-Za-z_][A-Za-z0-9_]*)(.*)$").expect("placeholder regex is valid")
    });

    let trimmed = input.trim();
    let Some(caps) = re.captures(trimmed) else {
        return Ok(None);
    };

    let name = caps[1].to_string();
    let rest = caps[2].trim();

    // 无参数简写: $generate_uuid
    if rest.is_empty() {
        return Ok(Some(Placeholder {
            name,
            args: Vec::new(),
        }));
    }

    // "$5 fee" 之类的普通文本
    if !rest.starts_with('(') {
        return Ok(None);
    }

    if !rest.ends_with(')') {
        return Err(TemplateError::syntax(trimmed, "missing closing ')'"));
    }

    let inner = &rest[1..rest.len() - 1];
    let args = parse_arguments(inner).map_err(|message| TemplateError::syntax(trimmed, message))?;

    Ok(Some(Placeholder { name, args }))
}

/// 解析参数列表（括号内部）
fn parse_arguments(input: &str) -> Result<Vec<Argument>, String> {
    let mut cursor = Cursor::new(input);
    let mut args = Vec::new();

    cursor.skip_whitespace();
    if cursor.is_end() {
        return Ok(args);
    }

    loop {
        cursor.skip_whitespace();
        args.push(cursor.argument()?);
        cursor.skip_whitespace();

        match cursor.bump() {
            None => break,
            Some(',') => {
                cursor.skip_whitespace();
                if cursor.is_end() {
                    return Err("expected argument after ','".to_string());
                }
            }
            Some(c) => return Err(format!("unexpected character '{}'", c)),
        }
    }

    Ok(args)
}

/// 基于字符的简单游标
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn is_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn identifier(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return None,
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    /// `key=value` 或位置参数
    fn argument(&mut self) -> Result<Argument, String> {
        let start = self.pos;
        if let Some(name) = self.identifier() {
            self.skip_whitespace();
            if self.peek() == Some('=') {
                self.pos += 1;
                let value = self.value()?;
                return Ok(Argument::named(name, value));
            }
            // 不是 key=，回退后按位置参数解析（如 true / false）
            self.pos = start;
        }
        Ok(Argument::positional(self.value()?))
    }

    fn value(&mut self) -> Result<ArgValue, String> {
        self.skip_whitespace();
        match self.peek() {
            None => Err("expected value".to_string()),
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.quoted(quote).map(ArgValue::String)
            }
            Some('[') => {
                self.pos += 1;
                self.list().map(ArgValue::List)
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.identifier().unwrap_or_default();
                match word.to_lowercase().as_str() {
                    "true" => Ok(ArgValue::Bool(true)),
                    "false" => Ok(ArgValue::Bool(false)),
                    _ => Err(format!(
                        "unquoted value '{}', string values must be quoted",
                        word
                    )),
                }
            }
            Some(c) => Err(format!("unexpected character '{}'", c)),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err("unterminated string literal".to_string()),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => return Err("unterminated string literal".to_string()),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn list(&mut self) -> Result<Vec<ArgValue>, String> {
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(items);
        }

        loop {
            items.push(self.value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(items),
                Some(c) => return Err(format!("unexpected character '{}' in list", c)),
                None => return Err("missing closing ']'".to_string()),
            }
        }
    }

    fn number(&mut self) -> Result<ArgValue, String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();

        if let Ok(n) = literal.parse::<i64>() {
            return Ok(ArgValue::Integer(n));
        }
        literal
            .parse::<f64>()
            .map(ArgValue::Float)
            .map_err(|_| format!("invalid number '{}'", literal))
    }
}
