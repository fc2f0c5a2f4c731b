pub mod loader;
pub mod template;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{GlobalConfig, RouteSpec, TestConfig};
