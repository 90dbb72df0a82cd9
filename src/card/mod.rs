//! Record card: the list view's presentation of one species record, its
//! details dialog, and the owner-only delete action.
//!
//! Views are plain data. The terminal front end in [`crate::ui`] renders them;
//! nothing here prints.

mod delete;

pub use delete::{
    CardContext, Confirmation, DeleteOutcome, DeleteState, DELETE_FAILED_TITLE, DELETE_PROMPT,
    DELETE_SUCCESS_TITLE,
};

use serde::Serialize;

use crate::models::SpeciesRecord;
use crate::utils::{truncate_preview, PREVIEW_CHARS};

bitflags::bitflags! {
    /// Actions a card offers to its viewer
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CardActions: u32 {
        const DETAILS = 1 << 0;
        const EDIT = 1 << 1;
        const DELETE = 1 << 2;
    }
}

/// The card as shown in the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub scientific_name: String,
    pub common_name: String,
    pub image: Option<String>,
    pub preview: String,
    #[serde(skip)]
    pub actions: CardActions,
}

/// The details dialog: a title and labelled rows in a fixed order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
    #[serde(skip)]
    pub actions: CardActions,
}

/// One record as seen by one viewer
#[derive(Debug, Clone)]
pub struct RecordCard {
    record: SpeciesRecord,
    viewer_id: String,
    details_open: bool,
    delete_state: DeleteState,
}

impl RecordCard {
    pub fn new(record: SpeciesRecord, viewer_id: impl Into<String>) -> Self {
        Self {
            record,
            viewer_id: viewer_id.into(),
            details_open: false,
            delete_state: DeleteState::Idle,
        }
    }

    pub fn record(&self) -> &SpeciesRecord {
        &self.record
    }

    /// Whether the viewer authored the record
    pub fn is_owner(&self) -> bool {
        self.record.is_owned_by(&self.viewer_id)
    }

    /// Actions available to this viewer
    pub fn actions(&self) -> CardActions {
        if self.is_owner() {
            CardActions::DETAILS | CardActions::EDIT | CardActions::DELETE
        } else {
            CardActions::DETAILS
        }
    }

    pub fn view(&self) -> CardView {
        CardView {
            scientific_name: self.record.scientific_name.clone(),
            common_name: self.record.common_name.clone().unwrap_or_default(),
            image: self.record.image.clone(),
            preview: self
                .record
                .description
                .as_deref()
                .map(|d| truncate_preview(d, PREVIEW_CHARS))
                .unwrap_or_default(),
            actions: self.actions(),
        }
    }

    pub fn open_details(&mut self) {
        self.details_open = true;
    }

    /// Close the details dialog. Nothing else changes.
    pub fn close_details(&mut self) {
        self.details_open = false;
    }

    pub fn is_details_open(&self) -> bool {
        self.details_open
    }

    /// The details dialog, while it is open
    pub fn details(&self) -> Option<DetailsView> {
        self.details_open.then(|| self.details_view())
    }

    /// The details dialog content regardless of open state
    pub fn details_view(&self) -> DetailsView {
        let record = &self.record;
        DetailsView {
            title: record.common_name.clone().unwrap_or_default(),
            rows: vec![
                ("Scientific Name", record.scientific_name.clone()),
                (
                    "Total Population",
                    record
                        .total_population
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                ),
                ("Kingdom", record.kingdom.to_string()),
                (
                    "Description",
                    record.description.clone().unwrap_or_default(),
                ),
            ],
            actions: self.actions(),
        }
    }

    pub fn delete_state(&self) -> DeleteState {
        self.delete_state
    }
}

/// Errors from card interactions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    /// The viewer does not own the record
    #[error("Only the author of '{0}' may change it")]
    NotOwner(String),

    /// `resolve_delete` was called without a pending confirmation
    #[error("No delete of '{0}' is awaiting confirmation")]
    NothingToConfirm(String),
}
