use anyhow::Context;
use virtual_library_catalog::api::{Book, BookSearch};
use virtual_library_catalog::search_sequencer::SearchSequencer;
use virtual_library_history::search_history::SearchHistoryStore;

/// Handles a submitted query: remembers it in the history, then searches the catalog
/// The query is recorded whatever the outcome of the search, empty queries are not recorded
pub async fn submit_search(
    search: &dyn BookSearch,
    sequencer: &SearchSequencer,
    history: &SearchHistoryStore,
    query: &str,
) -> anyhow::Result<Option<Vec<Book>>> {
    if !query.is_empty() {
        history
            .record(query)
            .context("Failed to record recent search")?;
    }

    let Some(result) = sequencer.search_latest(search, query).await else {
        return Ok(None);
    };
    let books = result.with_context(|| format!("Search for {:?} failed", query))?;
    Ok(Some(books))
}

pub fn remove_recent_search(history: &SearchHistoryStore, query: &str) -> anyhow::Result<()> {
    history
        .remove(query)
        .context("Failed to remove recent search")
}
