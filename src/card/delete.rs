//! Two-step delete: ask for confirmation, then act only on an explicit yes.
//!
//! Nothing blocks while the question is open. The card sits in
//! [`DeleteState::Confirming`] until the answer arrives through
//! [`RecordCard::resolve_delete`]. The record stays on screen until the store
//! confirms the delete and the list is refreshed.

use std::sync::Arc;

use crate::card::{CardError, RecordCard};
use crate::notify::{Notification, Notifier, Refresher};
use crate::store::RecordStore;

pub const DELETE_FAILED_TITLE: &str = "Something went wrong.";
pub const DELETE_SUCCESS_TITLE: &str = "Species Deleted Successfully!";

/// Where a card is in the delete interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming,
    Deleting,
}

/// The user's answer to "Are you sure you want to delete this species?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    /// Interpret a typed answer; only an explicit yes confirms
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Confirmation::Yes,
            _ => Confirmation::No,
        }
    }
}

/// Result of a resolved delete interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user answered no; nothing was sent
    Cancelled,
    /// The store deleted the record and the list was asked to refresh
    Deleted,
    /// The store refused; the message was shown to the user
    Failed(String),
}

/// Collaborators a card needs to carry out a delete
#[derive(Debug, Clone)]
pub struct CardContext {
    pub store: Arc<dyn RecordStore>,
    pub notifier: Arc<dyn Notifier>,
    pub refresher: Arc<dyn Refresher>,
}

/// Prompt shown while a delete awaits confirmation.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this species?";

impl RecordCard {
    /// Ask to delete the record. Moves the card to [`DeleteState::Confirming`].
    ///
    /// Only the record's author may ask. Asking again while a confirmation is
    /// open leaves it open.
    pub fn request_delete(&mut self) -> Result<&'static str, CardError> {
        if !self.is_owner() {
            return Err(CardError::NotOwner(self.record.scientific_name.clone()));
        }

        self.delete_state = DeleteState::Confirming;
        Ok(DELETE_PROMPT)
    }

    /// Answer the open confirmation.
    ///
    /// `No` returns the card to idle without contacting anything. `Yes` sends
    /// exactly one delete to the store, then either refreshes the list and
    /// reports success, or reports the store's error and leaves everything
    /// else as it was.
    pub async fn resolve_delete(
        &mut self,
        answer: Confirmation,
        ctx: &CardContext,
    ) -> Result<DeleteOutcome, CardError> {
        if self.delete_state != DeleteState::Confirming {
            return Err(CardError::NothingToConfirm(
                self.record.scientific_name.clone(),
            ));
        }

        if answer == Confirmation::No {
            self.delete_state = DeleteState::Idle;
            return Ok(DeleteOutcome::Cancelled);
        }

        self.delete_state = DeleteState::Deleting;
        let result = ctx.store.delete_by_id(self.record.id).await;
        self.delete_state = DeleteState::Idle;

        match result {
            Err(e) => {
                tracing::warn!(id = self.record.id, error = %e, "Delete failed");
                let message = e.to_string();
                ctx.notifier.notify(
                    Notification::destructive(DELETE_FAILED_TITLE).description(message.clone()),
                );
                Ok(DeleteOutcome::Failed(message))
            }
            Ok(()) => {
                ctx.refresher.refresh();
                ctx.notifier.notify(
                    Notification::new(DELETE_SUCCESS_TITLE).description(format!(
                        "Successfully Deleted {}.",
                        self.record.scientific_name
                    )),
                );
                Ok(DeleteOutcome::Deleted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::tests::lion;
    use crate::notify::{RecordingNotifier, RecordingRefresher, Variant};
    use crate::store::MemoryStore;

    struct Harness {
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        refresher: Arc<RecordingRefresher>,
        ctx: CardContext,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::with_records([lion(None)]));
        let notifier = Arc::new(RecordingNotifier::new());
        let refresher = Arc::new(RecordingRefresher::new());
        let ctx = CardContext {
            store: store.clone(),
            notifier: notifier.clone(),
            refresher: refresher.clone(),
        };
        Harness {
            store,
            notifier,
            refresher,
            ctx,
        }
    }

    #[test]
    fn test_confirmation_from_answer() {
        assert_eq!(Confirmation::from_answer("y"), Confirmation::Yes);
        assert_eq!(Confirmation::from_answer(" YES \n"), Confirmation::Yes);
        assert_eq!(Confirmation::from_answer("n"), Confirmation::No);
        assert_eq!(Confirmation::from_answer(""), Confirmation::No);
        assert_eq!(Confirmation::from_answer("sure"), Confirmation::No);
    }

    #[tokio::test]
    async fn test_answer_no_sends_nothing() {
        let h = harness();
        let mut card = RecordCard::new(lion(None), "owner-1");

        card.request_delete().unwrap();
        assert_eq!(card.delete_state(), DeleteState::Confirming);

        let outcome = card.resolve_delete(Confirmation::No, &h.ctx).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(card.delete_state(), DeleteState::Idle);
        assert_eq!(h.store.delete_count(), 0);
        assert_eq!(h.notifier.count(), 0);
        assert_eq!(h.refresher.count(), 0);
    }

    #[tokio::test]
    async fn test_answer_yes_deletes_refreshes_and_notifies() {
        let h = harness();
        let mut card = RecordCard::new(lion(None), "owner-1");

        card.request_delete().unwrap();
        let outcome = card.resolve_delete(Confirmation::Yes, &h.ctx).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(h.store.delete_count(), 1);
        assert_eq!(h.refresher.count(), 1);

        let received = h.notifier.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].title, DELETE_SUCCESS_TITLE);
        assert_eq!(received[0].variant, Variant::Normal);
        assert!(received[0]
            .description
            .as_deref()
            .unwrap()
            .contains("Panthera leo"));
        assert!(h.ctx.store.get(12).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_without_refresh() {
        let h = harness();
        h.store.fail_deletes("row-level security violation").await;
        let mut card = RecordCard::new(lion(None), "owner-1");

        card.request_delete().unwrap();
        let outcome = card.resolve_delete(Confirmation::Yes, &h.ctx).await.unwrap();

        assert!(matches!(outcome, DeleteOutcome::Failed(ref m) if m.contains("row-level security")));
        assert_eq!(h.refresher.count(), 0);
        assert_eq!(card.delete_state(), DeleteState::Idle);
        assert_eq!(card.record().id, 12);

        let received = h.notifier.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].title, DELETE_FAILED_TITLE);
        assert_eq!(received[0].variant, Variant::Destructive);
        assert!(received[0]
            .description
            .as_deref()
            .unwrap()
            .contains("row-level security violation"));
    }

    #[tokio::test]
    async fn test_second_delete_of_same_record_is_tolerated() {
        let h = harness();
        let mut first = RecordCard::new(lion(None), "owner-1");
        let mut second = RecordCard::new(lion(None), "owner-1");

        first.request_delete().unwrap();
        second.request_delete().unwrap();
        first.resolve_delete(Confirmation::Yes, &h.ctx).await.unwrap();
        let outcome = second
            .resolve_delete(Confirmation::Yes, &h.ctx)
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(h.store.delete_count(), 2);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_request_delete() {
        let h = harness();
        let mut card = RecordCard::new(lion(None), "visitor");

        assert!(matches!(card.request_delete(), Err(CardError::NotOwner(_))));
        assert!(matches!(
            card.resolve_delete(Confirmation::Yes, &h.ctx).await,
            Err(CardError::NothingToConfirm(_))
        ));
        assert_eq!(h.store.delete_count(), 0);
    }
}
