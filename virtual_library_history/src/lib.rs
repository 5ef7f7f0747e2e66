pub mod search_history;
pub mod settings_store;
