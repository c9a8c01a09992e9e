//! Infrastructure - concrete adapters behind the outbound ports.

pub mod http_client;
pub mod platform;

pub use http_client::HttpScenarioApi;
pub use platform::FileStorageProvider;
