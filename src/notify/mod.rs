//! User-facing notification and list-refresh collaborators.
//!
//! Both are fire-and-forget: callers never wait on them and never learn
//! whether the user saw anything.

pub mod mock;

pub use mock::{RecordingNotifier, RecordingRefresher};

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Normal,
    Destructive,
}

/// A transient, non-blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: Variant,
}

impl Notification {
    /// A normal notification with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: Variant::Normal,
        }
    }

    /// A destructive notification with only a title
    pub fn destructive(title: impl Into<String>) -> Self {
        Self::new(title).variant(Variant::Destructive)
    }

    /// Set the description line
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the variant
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }
}

/// Shows notifications to the user
pub trait Notifier: Send + Sync + std::fmt::Debug {
    fn notify(&self, notification: Notification);
}

/// Asks the surrounding list view to re-fetch its records
pub trait Refresher: Send + Sync + std::fmt::Debug {
    fn refresh(&self);
}

/// Refresher that raises a flag for the list view to pick up
#[derive(Debug, Default)]
pub struct RefreshFlag {
    raised: AtomicBool,
}

impl RefreshFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh was requested, lowering the flag
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }
}

impl Refresher for RefreshFlag {
    fn refresh(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }
}
