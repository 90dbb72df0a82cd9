//! PostgREST record store.
//!
//! Talks to `<url>/rest/v1/<table>` with the project's API key, which is how
//! a Supabase-hosted table is reached without a client SDK.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::models::{NewSpeciesRecord, SpeciesRecord};
use crate::store::{RecordStore, StoreError};
use crate::utils::HttpClient;

/// Record store backed by a PostgREST table
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: table.into(),
        })
    }

    /// Build a store from the `[store]` configuration section
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::NotConfigured("store.url is not set".to_string()))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| StoreError::NotConfigured("store.api_key is not set".to_string()))?;

        Self::new(url, api_key, &config.table)
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Pass successful responses through; turn the rest into [`StoreError::Api`]
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(response: Response) -> Result<Vec<SpeciesRecord>, StoreError> {
        let body = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn list(&self) -> Result<Vec<SpeciesRecord>, StoreError> {
        tracing::debug!(table = %self.table, "Listing records");

        let response = self
            .authorized(self.client.client().get(self.table_url()))
            .query(&[("select", "*"), ("order", "id.asc")])
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("Failed to list records: {}", e)))?;

        Self::rows(response).await
    }

    async fn get(&self, id: i64) -> Result<Option<SpeciesRecord>, StoreError> {
        let response = self
            .authorized(self.client.client().get(self.table_url()))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("Failed to fetch record {}: {}", id, e)))?;

        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn insert(&self, record: &NewSpeciesRecord) -> Result<SpeciesRecord, StoreError> {
        let response = self
            .authorized(self.client.client().post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("Failed to insert record: {}", e)))?;

        let stored = Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Parse("insert returned no rows".to_string()))?;

        tracing::info!(id = stored.id, name = %stored.scientific_name, "Record inserted");
        Ok(stored)
    }

    async fn update(
        &self,
        id: i64,
        record: &NewSpeciesRecord,
    ) -> Result<SpeciesRecord, StoreError> {
        let response = self
            .authorized(self.client.client().patch(self.table_url()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("Failed to update record {}: {}", id, e)))?;

        let stored = Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound(id))?;

        tracing::info!(id, "Record updated");
        Ok(stored)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.client().delete(self.table_url()))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("Failed to delete record {}: {}", id, e)))?;

        Self::check(response).await?;
        tracing::info!(id, "Record deleted");
        Ok(())
    }
}

// ===== PostgREST Types =====

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}
