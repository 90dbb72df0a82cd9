//! Search query and encyclopedia result models.
//!
//! The encyclopedia answers one search with three independently keyed result
//! sets. Keys are page ids and are not guaranteed to agree across the sets, so
//! the only join key is the relevance rank. [`RankedPages`] resolves the top
//! ranked entry once, when the set is built, and every consumer reads that
//! single answer.

use serde::{Deserialize, Serialize};

use crate::utils::first_paragraph;

/// Relevance rank of the most relevant hit.
pub const TOP_RANK: u32 = 1;

/// A normalized, non-empty search term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalize raw input.
    ///
    /// Returns `None` for missing, empty or whitespace-only input; otherwise the
    /// trimmed term.
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The normalized term
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate search metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchInfo {
    /// Total number of hits reported by the service
    pub total_hits: u64,
}

impl SearchInfo {
    pub fn is_empty(&self) -> bool {
        self.total_hits == 0
    }
}

/// Thumbnail image attached to a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL
    pub source: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One entry of a ranked result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPage<T> {
    /// Key of the entry in the response (page id)
    pub page_id: String,

    /// Relevance rank, 1 being the top match
    pub rank: u32,

    /// Entry data, absent when the service had none for this page
    pub payload: Option<T>,
}

/// A result set keyed by page id, joined to the others by relevance rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPages<T> {
    top: Option<RankedPage<T>>,
    len: usize,
}

impl<T> Default for RankedPages<T> {
    fn default() -> Self {
        Self { top: None, len: 0 }
    }
}

impl<T> RankedPages<T> {
    /// Build a result set, keeping the first entry whose rank is [`TOP_RANK`].
    ///
    /// Iteration order of `pages` carries no meaning beyond breaking ties
    /// between several top-ranked entries.
    pub fn from_pages(pages: impl IntoIterator<Item = RankedPage<T>>) -> Self {
        let mut top = None;
        let mut len = 0;

        for page in pages {
            len += 1;
            if top.is_none() && page.rank == TOP_RANK {
                top = Some(page);
            }
        }

        Self { top, len }
    }

    /// The top-ranked entry, if any
    pub fn top(&self) -> Option<&RankedPage<T>> {
        self.top.as_ref()
    }

    /// Data of the top-ranked entry, if the entry exists and carries any
    pub fn top_payload(&self) -> Option<&T> {
        self.top.as_ref().and_then(|page| page.payload.as_ref())
    }

    /// Number of entries the set was built from
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The three result sets of one submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResultSet {
    pub info: SearchInfo,
    pub thumbnails: RankedPages<Thumbnail>,
    pub extracts: RankedPages<String>,
}

impl SearchResultSet {
    /// Pick the most relevant image and introductory paragraph.
    pub fn selected(&self) -> SelectedResult {
        let image_url = self
            .thumbnails
            .top_payload()
            .map(|thumbnail| thumbnail.source.clone());

        let description = self
            .extracts
            .top_payload()
            .filter(|extract| !extract.is_empty())
            .map(|extract| first_paragraph(extract).to_string());

        SelectedResult {
            image_url,
            description,
        }
    }
}

/// What the top-ranked hit contributes to a record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectedResult {
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Discrete "found" events published by the search workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SearchEvent {
    ImageFound(String),
    DescriptionFound(String),
}

/// Summary of a completed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Normalized term that was searched
    pub query: String,

    /// Total hits reported by the service
    pub total_hits: u64,

    /// Image URL published to the sink, if any
    pub image_url: Option<String>,

    /// Description published to the sink, if any
    pub description: Option<String>,
}
