use std::collections::HashMap;

use serde_json::Value;

use crate::settings_store::{SettingsStore, SettingsStoreError};

#[derive(Default)]
pub struct InMemorySettingsStore {
    values: parking_lot::RwLock<HashMap<String, Value>>,
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, SettingsStoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsStoreError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }
}
