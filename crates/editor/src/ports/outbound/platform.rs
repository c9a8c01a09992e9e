//! Platform abstraction ports.
//!
//! Session persistence goes through `StorageProvider` so application code
//! stays platform-agnostic and testable; the desktop implementation lives in
//! infrastructure.

/// Persistent key-value storage abstraction (file-based on desktop)
pub trait StorageProvider: Clone + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Storage key constants
///
/// Kept in the ports layer as they define the contract for what keys are
/// used across the application.
pub mod storage_keys {
    pub const USER: &str = "trailbldr_user";
    pub const TOKEN: &str = "trailbldr_token";
}
