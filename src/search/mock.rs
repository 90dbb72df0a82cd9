//! Mock encyclopedia and sink for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{RankedPages, SearchEvent, SearchInfo, SearchQuery, SearchResultSet, Thumbnail};
use crate::search::{Encyclopedia, SearchError, SearchSink};

/// One of the three lookups an encyclopedia performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SearchInfo,
    Thumbnails,
    Extracts,
}

/// An encyclopedia that returns predefined results and counts lookups.
#[derive(Debug, Default)]
pub struct MockEncyclopedia {
    results: Mutex<SearchResultSet>,
    failing: Mutex<Option<Endpoint>>,
    last_query: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MockEncyclopedia {
    /// Create a mock with no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the results every lookup answers from.
    pub fn set_results(&self, results: SearchResultSet) {
        *self.results.lock().unwrap() = results;
    }

    /// Make one lookup fail with a 503 status.
    pub fn fail_on(&self, endpoint: Endpoint) {
        *self.failing.lock().unwrap() = Some(endpoint);
    }

    /// Total lookups performed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Term of the most recent lookup.
    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    fn record(&self, endpoint: Endpoint, query: &SearchQuery) -> Result<(), SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());

        if *self.failing.lock().unwrap() == Some(endpoint) {
            return Err(SearchError::Transport {
                endpoint: format!("{:?}", endpoint),
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Encyclopedia for MockEncyclopedia {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Encyclopedia"
    }

    async fn search_info(&self, query: &SearchQuery) -> Result<SearchInfo, SearchError> {
        self.record(Endpoint::SearchInfo, query)?;
        Ok(self.results.lock().unwrap().info)
    }

    async fn thumbnails(
        &self,
        query: &SearchQuery,
    ) -> Result<RankedPages<Thumbnail>, SearchError> {
        self.record(Endpoint::Thumbnails, query)?;
        Ok(self.results.lock().unwrap().thumbnails.clone())
    }

    async fn extracts(&self, query: &SearchQuery) -> Result<RankedPages<String>, SearchError> {
        self.record(Endpoint::Extracts, query)?;
        Ok(self.results.lock().unwrap().extracts.clone())
    }
}

/// A sink that records every event it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SearchEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SearchSink for RecordingSink {
    fn image_found(&self, url: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SearchEvent::ImageFound(url.to_string()));
    }

    fn description_found(&self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SearchEvent::DescriptionFound(text.to_string()));
    }
}
