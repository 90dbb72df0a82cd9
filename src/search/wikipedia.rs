//! Wikipedia (MediaWiki action API) encyclopedia implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EncyclopediaConfig;
use crate::models::{RankedPage, RankedPages, SearchInfo, SearchQuery, Thumbnail};
use crate::search::{Encyclopedia, SearchError};
use crate::utils::{default_user_agent, HttpClient};

/// English Wikipedia action API endpoint.
pub const WIKIPEDIA_API_BASE: &str = "https://en.wikipedia.org/w/api.php";

const DEFAULT_RESULT_LIMIT: u32 = 20;
const DEFAULT_THUMBNAIL_SIZE: u32 = 100;

/// Wikipedia search client
///
/// The search term is embedded in the query string as typed; only the URL
/// parser's default escaping applies.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: Arc<HttpClient>,
    base_url: String,
    result_limit: u32,
    thumbnail_size: u32,
}

impl WikipediaClient {
    pub fn new() -> Result<Self, SearchError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            base_url: WIKIPEDIA_API_BASE.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        })
    }

    /// Build a client from the `[encyclopedia]` configuration section
    pub fn from_config(config: &EncyclopediaConfig) -> Result<Self, SearchError> {
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(default_user_agent());
        let client = HttpClient::with_options(
            user_agent,
            Duration::from_secs(config.timeout_seconds),
        )?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            result_limit: config.result_limit,
            thumbnail_size: config.thumbnail_size,
        })
    }

    /// Point the client at another endpoint (mirrors, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn search_info_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?action=query&list=search&prop=info&inprop=url&utf8=&format=json&origin=*&srlimit={}&srsearch={}",
            self.base_url, self.result_limit, query
        )
    }

    pub(crate) fn thumbnails_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?action=query&generator=search&gsrsearch={}&prop=pageimages&piprop=thumbnail&pithumbsize={}&format=json&origin=*",
            self.base_url, query, self.thumbnail_size
        )
    }

    pub(crate) fn extracts_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?action=query&generator=search&gsrsearch={}&prop=extracts&exintro&explaintext&format=json&origin=*",
            self.base_url, query
        )
    }

    /// GET `url` and return the body, failing on any non-success status
    async fn fetch(&self, endpoint: &str, url: &str) -> Result<Vec<u8>, SearchError> {
        let url = url::Url::parse(url).map_err(|e| SearchError::InvalidEndpoint(e.to_string()))?;

        tracing::debug!(endpoint, %url, "Querying Wikipedia");

        let response = self
            .client
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to query Wikipedia: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, %status, "Wikipedia returned an error status");
            return Err(SearchError::Transport {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    fn id(&self) -> &str {
        "wikipedia"
    }

    fn name(&self) -> &str {
        "Wikipedia"
    }

    async fn search_info(&self, query: &SearchQuery) -> Result<SearchInfo, SearchError> {
        let body = self
            .fetch("search info", &self.search_info_url(query))
            .await?;
        parse_search_info(&body)
    }

    async fn thumbnails(
        &self,
        query: &SearchQuery,
    ) -> Result<RankedPages<Thumbnail>, SearchError> {
        let body = self.fetch("thumbnails", &self.thumbnails_url(query)).await?;
        parse_thumbnails(&body)
    }

    async fn extracts(&self, query: &SearchQuery) -> Result<RankedPages<String>, SearchError> {
        let body = self.fetch("extracts", &self.extracts_url(query)).await?;
        parse_extracts(&body)
    }
}

pub(crate) fn parse_search_info(body: &[u8]) -> Result<SearchInfo, SearchError> {
    let data: WikiResponse<WikiSearchQuery> = decode(body)?;
    let query = data
        .query
        .ok_or_else(|| SearchError::Parse("missing 'query' in search response".to_string()))?;

    Ok(SearchInfo {
        total_hits: query.searchinfo.totalhits,
    })
}

pub(crate) fn parse_thumbnails(body: &[u8]) -> Result<RankedPages<Thumbnail>, SearchError> {
    let data: WikiResponse<WikiPages<WikiThumbnailPage>> = decode(body)?;
    let pages = data.query.map(|q| q.pages).unwrap_or_default();

    Ok(RankedPages::from_pages(pages.into_iter().map(
        |(page_id, page)| RankedPage {
            page_id,
            rank: page.index.unwrap_or_default(),
            payload: page.thumbnail.map(|t| Thumbnail {
                source: t.source,
                width: t.width,
                height: t.height,
            }),
        },
    )))
}

pub(crate) fn parse_extracts(body: &[u8]) -> Result<RankedPages<String>, SearchError> {
    let data: WikiResponse<WikiPages<WikiExtractPage>> = decode(body)?;
    let pages = data.query.map(|q| q.pages).unwrap_or_default();

    Ok(RankedPages::from_pages(pages.into_iter().map(
        |(page_id, page)| RankedPage {
            page_id,
            rank: page.index.unwrap_or_default(),
            payload: page.extract,
        },
    )))
}

/// Decode a response body, surfacing in-band API errors
fn decode<Q: DeserializeOwned>(body: &[u8]) -> Result<WikiResponse<Q>, SearchError> {
    let data: WikiResponse<Q> = serde_json::from_slice(body)?;
    if let Some(error) = &data.error {
        return Err(SearchError::Api(format!("{}: {}", error.code, error.info)));
    }
    Ok(data)
}

// ===== Wikipedia API Types =====

#[derive(Debug, Deserialize)]
struct WikiResponse<Q> {
    // Generator searches with no hits omit `query` entirely
    query: Option<Q>,
    #[serde(default)]
    error: Option<WikiError>,
}

#[derive(Debug, Deserialize)]
struct WikiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct WikiSearchQuery {
    searchinfo: WikiSearchInfo,
}

#[derive(Debug, Deserialize)]
struct WikiSearchInfo {
    totalhits: u64,
}

#[derive(Debug, Deserialize)]
struct WikiPages<P> {
    #[serde(default = "BTreeMap::new")]
    pages: BTreeMap<String, P>,
}

#[derive(Debug, Deserialize)]
struct WikiThumbnailPage {
    index: Option<u32>,
    thumbnail: Option<WikiThumbnail>,
}

#[derive(Debug, Deserialize)]
struct WikiThumbnail {
    source: String,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WikiExtractPage {
    index: Option<u32>,
    extract: Option<String>,
}
