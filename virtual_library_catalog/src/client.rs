use std::time::Duration;

use anyhow::Context;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use url::Url;

use crate::api::{Book, BookSearch, SearchError};
use crate::catalog_response::CatalogResponse;

pub const DEFAULT_CATALOG_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Number of volumes requested from the catalog for every search
pub const MAX_RESULTS: u32 = 20;

#[derive(Debug, Clone)]
pub struct BookSearchClientConfig {
    pub base_url: String,
    pub api_key: String,
    /// Transport default when None
    pub timeout: Option<Duration>,
}

impl Default for BookSearchClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: String::new(),
            timeout: None,
        }
    }
}

/// Stateless client of the book catalog search API
/// Every call to `search` issues exactly one GET request, without retries
pub struct BookSearchClient {
    base_url: String,
    api_key: String,
    client: ClientWithMiddleware,
}

impl BookSearchClient {
    pub fn new(config: BookSearchClientConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let reqwest_client = builder.build().context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            base_url: config.base_url,
            api_key: config.api_key,
            client,
        })
    }

    /// Leaves out the `key` parameter when no api key is configured
    fn search_url(&self, title: &str) -> Result<Url, SearchError> {
        let mut url = format!("{}?q={}", self.base_url, urlencoding::encode(title));
        if !self.api_key.is_empty() {
            url.push_str(&format!("&key={}", urlencoding::encode(&self.api_key)));
        }
        url.push_str(&format!("&maxResults={}", MAX_RESULTS));
        Ok(Url::parse(&url)?)
    }
}

#[async_trait::async_trait]
impl BookSearch for BookSearchClient {
    /// Calls GET {base_url}?q={title}&key={api_key}&maxResults=20
    /// Incomplete volumes are left out of the result, which is not an error
    async fn search(&self, title: &str) -> Result<Vec<Book>, SearchError> {
        let url = self.search_url(title)?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Catalog search for {:?} failed with status {}", title, status);
            return Err(SearchError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(reqwest_middleware::Error::Reqwest)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(SearchError::NoData);
        }

        let catalog_response: CatalogResponse = serde_json::from_slice(&body)?;
        let books = catalog_response.into_books();
        tracing::info!("Catalog search for {:?} returned {} books", title, books.len());
        Ok(books)
    }
}
