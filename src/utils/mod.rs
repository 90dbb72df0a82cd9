//! Utility modules shared by the search, store and card layers.
//!
//! - [`HttpClient`]: shared reqwest client with user agent and timeouts
//! - [`truncate_preview`]: shorten a description for a card preview
//! - [`first_paragraph`]: the introductory paragraph of an extract

mod http;
mod text;

pub use http::{default_user_agent, HttpClient, DEFAULT_TIMEOUT};
pub use text::{first_paragraph, truncate_preview, ELLIPSIS, PREVIEW_CHARS};
