use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::api::{Book, BookSearch, SearchError};

/// Hands out increasing generations to searches so that a caller
/// can discard completions that were overtaken by a newer query
#[derive(Clone, Default)]
pub struct SearchSequencer {
    latest_generation: Arc<AtomicU64>,
}

pub struct SearchTicket {
    generation: u64,
    latest_generation: Arc<AtomicU64>,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True until a newer ticket is handed out by the same sequencer
    pub fn is_current(&self) -> bool {
        self.latest_generation.load(Ordering::SeqCst) == self.generation
    }
}

impl SearchSequencer {
    pub fn begin(&self) -> SearchTicket {
        let generation = self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            generation,
            latest_generation: self.latest_generation.clone(),
        }
    }

    /// Runs a single search and returns None if another search
    /// was started through this sequencer before it completed
    pub async fn search_latest<S: BookSearch + ?Sized>(
        &self,
        search: &S,
        title: &str,
    ) -> Option<Result<Vec<Book>, SearchError>> {
        let ticket = self.begin();
        let result = search.search(title).await;
        if ticket.is_current() {
            Some(result)
        } else {
            tracing::debug!(
                "Discarding stale search for {:?}, generation {}",
                title,
                ticket.generation()
            );
            None
        }
    }
}
