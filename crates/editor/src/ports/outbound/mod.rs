//! Outbound ports - interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must
//! implement, allowing application services to interact with external
//! systems without depending on concrete implementations.

pub mod api_port;
pub mod platform;

pub use api_port::{ApiError, ScenarioApiPort};
pub use platform::{storage_keys, StorageProvider};

#[cfg(any(test, feature = "testing"))]
pub use api_port::MockScenarioApiPort;
