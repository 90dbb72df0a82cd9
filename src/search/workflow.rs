//! The search-and-populate workflow.

use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

use crate::models::{SearchEvent, SearchOutcome, SearchQuery, SearchResultSet};
use crate::notify::{Notification, Notifier};
use crate::search::{Encyclopedia, SearchError};

/// Title of the notification shown when a search has no hits.
pub const NO_RESULTS_TITLE: &str = "Search Result Does Not Exist";

/// Receives what a search found.
///
/// The owner of the record form implements this; the workflow never keeps
/// the image or description itself.
pub trait SearchSink: Send + Sync {
    fn image_found(&self, url: &str);
    fn description_found(&self, text: &str);
}

/// Sink that forwards findings as [`SearchEvent`]s over a channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SearchEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver its events arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SearchEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Search event dropped: receiver closed");
        }
    }
}

impl SearchSink for ChannelSink {
    fn image_found(&self, url: &str) {
        self.send(SearchEvent::ImageFound(url.to_string()));
    }

    fn description_found(&self, text: &str) {
        self.send(SearchEvent::DescriptionFound(text.to_string()));
    }
}

/// Sink built from two callbacks
pub struct CallbackSink<I, D> {
    on_image: I,
    on_description: D,
}

impl<I, D> CallbackSink<I, D>
where
    I: Fn(&str) + Send + Sync,
    D: Fn(&str) + Send + Sync,
{
    pub fn new(on_image: I, on_description: D) -> Self {
        Self {
            on_image,
            on_description,
        }
    }
}

impl<I, D> SearchSink for CallbackSink<I, D>
where
    I: Fn(&str) + Send + Sync,
    D: Fn(&str) + Send + Sync,
{
    fn image_found(&self, url: &str) {
        (self.on_image)(url)
    }

    fn description_found(&self, text: &str) {
        (self.on_description)(text)
    }
}

/// Searches an encyclopedia and reports the most relevant image and
/// introductory paragraph to a sink.
///
/// The workflow also holds the text of its query input, which it clears
/// once a description has been published. Submissions are not cancelled by
/// later ones: overlapping submissions each publish in completion order.
#[derive(Debug)]
pub struct SearchWorkflow {
    encyclopedia: Arc<dyn Encyclopedia>,
    notifier: Arc<dyn Notifier>,
    input: RwLock<String>,
}

impl SearchWorkflow {
    pub fn new(encyclopedia: Arc<dyn Encyclopedia>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            encyclopedia,
            notifier,
            input: RwLock::new(String::new()),
        }
    }

    /// Current text of the query input
    pub fn input(&self) -> String {
        self.input
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the text of the query input
    pub fn set_input(&self, text: impl Into<String>) {
        *self
            .input
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = text.into();
    }

    /// Submit whatever the query input currently holds
    pub async fn submit_input(
        &self,
        sink: &dyn SearchSink,
    ) -> Result<Option<SearchOutcome>, SearchError> {
        let raw = self.input();
        self.submit(Some(&raw), sink).await
    }

    /// Search for `raw` and publish the top-ranked findings to `sink`.
    ///
    /// Returns `Ok(None)` without touching the network when the input is
    /// missing or blank. If any lookup fails the error is returned and
    /// nothing is published.
    pub async fn submit(
        &self,
        raw: Option<&str>,
        sink: &dyn SearchSink,
    ) -> Result<Option<SearchOutcome>, SearchError> {
        let Some(query) = SearchQuery::normalize(raw) else {
            tracing::debug!("Ignoring empty search input");
            return Ok(None);
        };

        tracing::debug!(query = %query, source = self.encyclopedia.id(), "Submitting search");

        let results = self.encyclopedia.fetch_all(&query).await.inspect_err(|e| {
            tracing::warn!(query = %query, error = %e, "Search failed");
        })?;

        Ok(Some(self.publish(&query, &results, sink)))
    }

    fn publish(
        &self,
        query: &SearchQuery,
        results: &SearchResultSet,
        sink: &dyn SearchSink,
    ) -> SearchOutcome {
        if results.info.is_empty() {
            self.notifier.notify(Notification::destructive(NO_RESULTS_TITLE));
        }

        let selected = results.selected();

        if let Some(url) = &selected.image_url {
            sink.image_found(url);
        }

        if let Some(description) = &selected.description {
            sink.description_found(description);
            self.set_input("");
        }

        tracing::info!(
            query = %query,
            total_hits = results.info.total_hits,
            image = selected.image_url.is_some(),
            description = selected.description.is_some(),
            "Search complete"
        );

        SearchOutcome {
            query: query.to_string(),
            total_hits: results.info.total_hits,
            image_url: selected.image_url,
            description: selected.description,
        }
    }
}
