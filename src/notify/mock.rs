//! Recording collaborators for testing purposes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{Notification, Notifier, Refresher};

/// A notifier that keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}

/// A refresher that counts refresh requests.
#[derive(Debug, Default)]
pub struct RecordingRefresher {
    calls: AtomicUsize,
}

impl RecordingRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Refresher for RecordingRefresher {
    fn refresh(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
