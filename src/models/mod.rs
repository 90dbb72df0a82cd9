//! Core data models for species records and encyclopedia search.

mod draft;
mod search;
mod species;

pub use draft::{DraftError, RecordDraft};
pub use search::{
    RankedPage, RankedPages, SearchEvent, SearchInfo, SearchOutcome, SearchQuery,
    SearchResultSet, SelectedResult, Thumbnail, TOP_RANK,
};
pub use species::{Kingdom, NewSpeciesRecord, SpeciesRecord};
