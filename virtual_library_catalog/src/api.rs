use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

pub type BookId = Uuid;

/// Identifier used when the catalog has no ISBN_13 for a volume
pub const MISSING_ISBN: &str = "N/A";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ReadingStatus {
    #[default]
    ToRead,
    Reading,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub publisher: String,
    pub isbn: String,
    pub cover_image_url: Option<Url>,
    pub genres: Vec<String>,
    pub purchase_link: Url,
    pub total_pages: u32,
    pub pages_read: u32,
    pub reading_status: ReadingStatus,
    /// Between 0 and 5 when present
    pub rating: Option<f64>,
    pub notes: Option<String>,
    /// Seconds
    pub time_spent_reading: u64,
    pub checked_out_by: BTreeSet<String>,
    /// Seconds since UNIX epoch
    pub added_at: u64,
}

impl Book {
    /// Fraction of the book already read, in `[0, 1]`
    pub fn reading_progress(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        f64::from(self.pages_read.min(self.total_pages)) / f64::from(self.total_pages)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Query could not be encoded into a request url: {0}")]
    InvalidQuery(#[from] url::ParseError),

    #[error("Transport failure {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("Catalog responded with status {0}")]
    UnexpectedStatus(u16),

    #[error("Catalog response had no body")]
    NoData,

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait::async_trait]
pub trait BookSearch: Send + Sync {
    /// Searches the catalog by title, returns every result that maps to a complete book
    async fn search(&self, title: &str) -> Result<Vec<Book>, SearchError>;
}
