//! # Species Catalog
//!
//! Catalogue species records: search Wikipedia to prefill a record, then
//! create, edit, list and delete records in a shared hosted table.
//!
//! ## Architecture
//!
//! - [`models`]: Species records, record drafts, and search result models
//! - [`search`]: The encyclopedia seam, the Wikipedia client, and the
//!   search-and-populate workflow
//! - [`store`]: Record persistence (PostgREST and in-memory)
//! - [`card`]: Card and details views with the confirm-then-delete flow
//! - [`notify`]: Notification and list-refresh collaborators
//! - [`ui`]: Terminal rendering
//! - [`utils`]: HTTP client and text helpers
//! - [`config`]: Configuration management

pub mod card;
pub mod config;
pub mod models;
pub mod notify;
pub mod search;
pub mod store;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use card::RecordCard;
pub use models::{RecordDraft, SpeciesRecord};
pub use search::{Encyclopedia, SearchWorkflow, WikipediaClient};
pub use store::RecordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
