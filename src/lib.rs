pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod runner;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use error::{Result, RupressError};
