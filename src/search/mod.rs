//! Encyclopedia search: the lookup service seam and the search-and-populate
//! workflow built on it.
//!
//! An [`Encyclopedia`] answers a query with three independent lookups (hit
//! metadata, ranked thumbnails, ranked introductory extracts). The
//! [`SearchWorkflow`] runs all three concurrently, waits for every one of
//! them, and only then publishes the top-ranked image and description to a
//! [`SearchSink`].

pub mod mock;
mod wikipedia;
mod workflow;

pub use mock::{Endpoint, MockEncyclopedia, RecordingSink};
pub use wikipedia::{WikipediaClient, WIKIPEDIA_API_BASE};
pub use workflow::{CallbackSink, ChannelSink, SearchSink, SearchWorkflow, NO_RESULTS_TITLE};

use async_trait::async_trait;

use crate::models::{RankedPages, SearchInfo, SearchQuery, SearchResultSet, Thumbnail};

/// A searchable encyclopedia.
///
/// Each lookup is independent of the others. [`Encyclopedia::fetch_all`]
/// issues them concurrently and fails as a whole if any one fails.
#[async_trait]
pub trait Encyclopedia: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this encyclopedia (e.g. "wikipedia")
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Aggregate metadata (total hit count) for the query
    async fn search_info(&self, query: &SearchQuery) -> Result<SearchInfo, SearchError>;

    /// Ranked results carrying a small thumbnail each
    async fn thumbnails(&self, query: &SearchQuery)
        -> Result<RankedPages<Thumbnail>, SearchError>;

    /// Ranked results carrying a plain-text introductory extract each
    async fn extracts(&self, query: &SearchQuery) -> Result<RankedPages<String>, SearchError>;

    /// Run all three lookups concurrently and wait for every one of them
    async fn fetch_all(&self, query: &SearchQuery) -> Result<SearchResultSet, SearchError> {
        let (info, thumbnails, extracts) = tokio::try_join!(
            self.search_info(query),
            self.thumbnails(query),
            self.extracts(query)
        )?;

        Ok(SearchResultSet {
            info,
            thumbnails,
            extracts,
        })
    }
}

/// Errors that can occur when searching an encyclopedia
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The service answered with a non-success HTTP status
    #[error("{endpoint} request failed with status {status}")]
    Transport { endpoint: String, status: u16 },

    /// Network or HTTP client error
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The service reported an error inside a successful response
    #[error("API error: {0}")]
    Api(String),

    /// The request URL could not be built
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Parse(format!("JSON: {}", err))
    }
}
