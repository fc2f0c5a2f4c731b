pub mod generators;
pub mod parser;
pub mod resolver;
pub mod types;

pub use generators::Generator;
pub use parser::parse_placeholder;
pub use resolver::TemplateResolver;
pub use types::{ArgValue, Argument, Placeholder, TemplateError};
