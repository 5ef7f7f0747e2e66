pub use file_settings_store::FileSettingsStore;
pub use in_memory_settings_store::InMemorySettingsStore;

use serde_json::Value;

mod file_settings_store;
mod in_memory_settings_store;

#[derive(Debug, thiserror::Error)]
pub enum SettingsStoreError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Process-wide key-value settings, each key holding one JSON value
pub trait SettingsStore: Send + Sync {
    /// Returns the value stored under the key, None if it was never set
    fn get(&self, key: &str) -> Result<Option<Value>, SettingsStoreError>;
    /// Stores the value under the key, overwriting the previous one
    fn set(&self, key: &str, value: Value) -> Result<(), SettingsStoreError>;
}
