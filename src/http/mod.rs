pub mod builder;
pub mod client;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use builder::RequestBuilder;
pub use client::Client;
pub use request::Request;
pub use response::Response;
