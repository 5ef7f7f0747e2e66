pub mod api;
pub mod catalog_response;
pub mod client;
pub mod search_sequencer;
