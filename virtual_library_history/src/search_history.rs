use std::sync::Arc;

use serde_json::Value;

use crate::settings_store::{SettingsStore, SettingsStoreError};

pub const RECENT_SEARCHES_KEY: &str = "RecentSearchesKey";
pub const MAX_RECENT_SEARCHES: usize = 10;

/// What `record` does with a query that is already in the history
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum DuplicatePolicy {
    /// Leaves the entry where it is
    #[default]
    KeepPosition,
    /// Moves the entry to the front
    MoveToFront,
}

/// Recent search queries, most recent first, at most `MAX_RECENT_SEARCHES` unique entries
///
/// The whole list lives under a single key of the settings store and is rewritten on
/// every change. Read-modify-write is not atomic: callers sharing one history
/// between threads have to serialize `record` and `remove` themselves.
pub struct SearchHistoryStore {
    settings: Arc<dyn SettingsStore>,
    duplicate_policy: DuplicatePolicy,
}

impl SearchHistoryStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    /// Unreadable or malformed stored history is reported as empty
    pub fn list(&self) -> Vec<String> {
        match self.settings.get(RECENT_SEARCHES_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::warn!("Stored recent searches are malformed, ignoring: {}", err);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("Failed to read recent searches: {}", err);
                Vec::new()
            }
        }
    }

    pub fn record(&self, query: &str) -> Result<(), SettingsStoreError> {
        let mut searches = self.list();

        if let Some(index) = searches.iter().position(|search| search == query) {
            match self.duplicate_policy {
                DuplicatePolicy::KeepPosition => return Ok(()),
                DuplicatePolicy::MoveToFront => {
                    if index == 0 {
                        return Ok(());
                    }
                    searches.remove(index);
                }
            }
        }

        searches.insert(0, query.to_string());
        searches.truncate(MAX_RECENT_SEARCHES);
        self.store(searches)
    }

    /// Removes the first entry equal to the query, nothing is written if it is absent
    pub fn remove(&self, query: &str) -> Result<(), SettingsStoreError> {
        let mut searches = self.list();
        match searches.iter().position(|search| search == query) {
            Some(index) => {
                searches.remove(index);
                self.store(searches)
            }
            None => Ok(()),
        }
    }

    fn store(&self, searches: Vec<String>) -> Result<(), SettingsStoreError> {
        let value = Value::from(searches);
        self.settings.set(RECENT_SEARCHES_KEY, value)
    }
}
