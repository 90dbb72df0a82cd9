//! Persistence of species records.
//!
//! [`RecordStore`] is the seam to the hosted table. [`RestStore`] talks to a
//! PostgREST endpoint (the REST surface Supabase exposes); [`MemoryStore`]
//! keeps records in process for tests and offline use.
//!
//! Deleting an id that no longer exists is a successful no-op in every
//! implementation, so a repeated delete of the same record is harmless.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;

use crate::models::{NewSpeciesRecord, SpeciesRecord};

/// Storage for species records
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// All records, ordered by id
    async fn list(&self) -> Result<Vec<SpeciesRecord>, StoreError>;

    /// One record by id
    async fn get(&self, id: i64) -> Result<Option<SpeciesRecord>, StoreError>;

    /// Insert a record and return it with its assigned id
    async fn insert(&self, record: &NewSpeciesRecord) -> Result<SpeciesRecord, StoreError>;

    /// Replace the columns of an existing record
    async fn update(&self, id: i64, record: &NewSpeciesRecord)
        -> Result<SpeciesRecord, StoreError>;

    /// Delete a record by id
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;
}

/// Errors that can occur when talking to the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Network or HTTP client error
    #[error("Network error: {0}")]
    Network(String),

    /// The store rejected the request
    #[error("Store returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(i64),

    /// Store is not configured (missing URL or key)
    #[error("Store not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Parse(format!("JSON: {}", err))
    }
}
