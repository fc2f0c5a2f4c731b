use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use serde_json::Value;

use crate::template::types::{ArgValue, Argument, TemplateError};

/// 伪文本词库
const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

const SENTENCE_MIN_WORDS: usize = 4;
const SENTENCE_MAX_WORDS: usize = 12;
const MAX_WORDS: i64 = 10_000;
const DEFAULT_DATE_RANGE_DAYS: u64 = 365;

/// 内置生成器注册表（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Text,
    Paragraph,
    Uuid,
    Email,
    Phone,
    Date,
    Number,
    Boolean,
    FromOptions,
}

impl Generator {
    pub const ALL: [Generator; 9] = [
        Generator::Text,
        Generator::Paragraph,
        Generator::Uuid,
        Generator::Email,
        Generator::Phone,
        Generator::Date,
        Generator::Number,
        Generator::Boolean,
        Generator::FromOptions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Generator::Text => "generate_text",
            Generator::Paragraph => "generate_paragraph",
            Generator::Uuid => "generate_uuid",
            Generator::Email => "generate_email",
            Generator::Phone => "generate_phone",
            Generator::Date => "generate_date",
            Generator::Number => "generate_number",
            Generator::Boolean => "generate_boolean",
            Generator::FromOptions => "from_options",
        }
    }

    /// 参数名，按位置参数的绑定顺序排列
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            Generator::Text => &["min_words", "max_words"],
            Generator::Paragraph => &["min_sentences", "max_sentences"],
            Generator::Date => &["start_date", "end_date"],
            Generator::Number => &["min_val", "max_val"],
            Generator::FromOptions => &["options"],
            Generator::Uuid | Generator::Email | Generator::Phone | Generator::Boolean => &[],
        }
    }

    /// 用法示例（模板帮助信息）
    pub fn usage(&self) -> &'static str {
        match self {
            Generator::Text => "$generate_text(min_words=3, max_words=10) - Generate random text",
            Generator::Paragraph => {
                "$generate_paragraph(min_sentences=2, max_sentences=5) - Generate a paragraph"
            }
            Generator::Uuid => "$generate_uuid() - Generate a UUID",
            Generator::Email => "$generate_email() - Generate an email address",
            Generator::Phone => "$generate_phone() - Generate a phone number",
            Generator::Date => {
                "$generate_date(start_date=\"2024-01-01\", end_date=\"2024-12-31\") - Generate a date"
            }
            Generator::Number => {
                "$generate_number(min_val=0, max_val=100) - Generate a random integer"
            }
            Generator::Boolean => "$generate_boolean() - Generate a random boolean",
            Generator::FromOptions => {
                "$from_options([\"option1\", \"option2\"]) - Pick from provided options"
            }
        }
    }

    /// 生成一个值
    pub fn generate<R: Rng>(&self, args: &[Argument], rng: &mut R) -> Result<Value, TemplateError> {
        let args = BoundArgs::bind(*self, args)?;

        match self {
            Generator::Text => {
                let min = args.count("min_words", 3)?;
                let max = args.count("max_words", 10)?;
                let count = args.range(min, max, rng)?;
                Ok(Value::String(words(count, rng).join(" ")))
            }
            Generator::Paragraph => {
                let min = args.count("min_sentences", 2)?;
                let max = args.count("max_sentences", 5)?;
                let count = args.range(min, max, rng)?;
                Ok(Value::String(paragraph(count, rng)))
            }
            Generator::Uuid => {
                let uuid = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
                Ok(Value::String(uuid.to_string()))
            }
            Generator::Email => Ok(Value::String(format!(
                "{}@{}.com",
                lowercase(8, rng),
                lowercase(6, rng)
            ))),
            Generator::Phone => Ok(Value::String(format!(
                "+1{}{}{}",
                rng.random_range(200..=999),
                rng.random_range(100..=999),
                rng.random_range(1000..=9999)
            ))),
            Generator::Date => {
                let today = Local::now().date_naive();
                let end = args.date("end_date")?.unwrap_or(today);
                let start = match args.date("start_date")? {
                    Some(date) => date,
                    None => end
                        .checked_sub_days(Days::new(DEFAULT_DATE_RANGE_DAYS))
                        .unwrap_or(end),
                };
                if start > end {
                    return Err(args.invalid(format!(
                        "start_date {} is after end_date {}",
                        start, end
                    )));
                }
                let span = u64::try_from((end - start).num_days()).unwrap_or(0);
                let date = start
                    .checked_add_days(Days::new(rng.random_range(0..=span)))
                    .unwrap_or(end);
                Ok(Value::String(date.format("%Y-%m-%d").to_string()))
            }
            Generator::Number => {
                let min = args.integer("min_val", 0)?;
                let max = args.integer("max_val", 100)?;
                if max < min {
                    return Err(args.invalid(format!(
                        "max_val ({}) is less than min_val ({})",
                        max, min
                    )));
                }
                Ok(Value::from(rng.random_range(min..=max)))
            }
            Generator::Boolean => Ok(Value::Bool(rng.random_bool(0.5))),
            Generator::FromOptions => {
                let options = args
                    .list("options")?
                    .ok_or_else(|| args.invalid("missing required argument 'options'"))?;
                if options.is_empty() {
                    return Err(args.invalid("options list is empty"));
                }
                let index = rng.random_range(0..options.len());
                Ok(options[index].to_json())
            }
        }
    }
}

impl FromStr for Generator {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Generator::ALL
            .into_iter()
            .find(|generator| generator.name() == s)
            .ok_or_else(|| TemplateError::unknown_generator(s))
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 参数按名字绑定后的视图
struct BoundArgs<'a> {
    generator: Generator,
    values: HashMap<&'static str, &'a ArgValue>,
}

impl<'a> BoundArgs<'a> {
    fn bind(generator: Generator, args: &'a [Argument]) -> Result<Self, TemplateError> {
        let params = generator.params();
        let mut values = HashMap::new();
        let mut position = 0;

        for arg in args {
            let param = match &arg.name {
                Some(name) => params
                    .iter()
                    .copied()
                    .find(|p| *p == name.as_str())
                    .ok_or_else(|| {
                        TemplateError::invalid_argument(
                            generator.name(),
                            format!("unexpected argument '{}'", name),
                        )
                    })?,
                None => {
                    let param = params.get(position).copied().ok_or_else(|| {
                        TemplateError::invalid_argument(
                            generator.name(),
                            format!("takes at most {} argument(s)", params.len()),
                        )
                    })?;
                    position += 1;
                    param
                }
            };

            if values.insert(param, &arg.value).is_some() {
                return Err(TemplateError::invalid_argument(
                    generator.name(),
                    format!("argument '{}' given more than once", param),
                ));
            }
        }

        Ok(Self { generator, values })
    }

    fn invalid(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::invalid_argument(self.generator.name(), message)
    }

    fn type_error(&self, name: &str, expected: &str, actual: &ArgValue) -> TemplateError {
        self.invalid(format!(
            "'{}' must be {}, got {} {}",
            name,
            expected,
            actual.type_name(),
            actual
        ))
    }

    fn integer(&self, name: &str, default: i64) -> Result<i64, TemplateError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(ArgValue::Integer(n)) => Ok(*n),
            Some(other) => Err(self.type_error(name, "an integer", other)),
        }
    }

    /// 非负计数（单词数 / 句子数）
    fn count(&self, name: &str, default: i64) -> Result<i64, TemplateError> {
        let n = self.integer(name, default)?;
        if !(0..=MAX_WORDS).contains(&n) {
            return Err(self.invalid(format!(
                "'{}' must be between 0 and {}, got {}",
                name, MAX_WORDS, n
            )));
        }
        Ok(n)
    }

    fn range<R: Rng>(&self, min: i64, max: i64, rng: &mut R) -> Result<usize, TemplateError> {
        if max < min {
            return Err(self.invalid(format!(
                "maximum ({}) is less than minimum ({})",
                max, min
            )));
        }
        // count() 已保证非负
        Ok(usize::try_from(rng.random_range(min..=max)).unwrap_or(0))
    }

    fn date(&self, name: &str) -> Result<Option<NaiveDate>, TemplateError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ArgValue::String(s)) => {
                // 允许 "2024-01-01T10:00:00" 这种完整时间，只取日期部分
                let date_part = s.split('T').next().unwrap_or(s);
                NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|e| self.invalid(format!("'{}' is not an ISO date: {}", s, e)))
            }
            Some(other) => Err(self.type_error(name, "an ISO date string", other)),
        }
    }

    fn list(&self, name: &str) -> Result<Option<&'a [ArgValue]>, TemplateError> {
        match self.values.get(name).copied() {
            None => Ok(None),
            Some(ArgValue::List(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(self.type_error(name, "a list", other)),
        }
    }
}

fn words<R: Rng>(count: usize, rng: &mut R) -> Vec<&'static str> {
    (0..count)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect()
}

fn paragraph<R: Rng>(sentences: usize, rng: &mut R) -> String {
    (0..sentences)
        .map(|_| {
            let count = rng.random_range(SENTENCE_MIN_WORDS..=SENTENCE_MAX_WORDS);
            let sentence = words(count, rng).join(" ");
            let mut chars = sentence.chars();
            match chars.next() {
                Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lowercase<R: Rng>(len: usize, rng: &mut R) -> String {
    (0..len)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}
