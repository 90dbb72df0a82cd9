//! Form state of the create/edit record dialog.
//!
//! The draft owns the image and description fields that the search workflow
//! reports. It is the only writer of those fields: the workflow emits
//! [`SearchEvent`]s and the draft applies them.

use serde::{Deserialize, Serialize};

use crate::models::{Kingdom, NewSpeciesRecord, SearchEvent, SpeciesRecord};

/// Unvalidated field values of a record form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordDraft {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub kingdom: Option<Kingdom>,
    pub total_population: Option<i64>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl RecordDraft {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill a draft from an existing record, for editing
    pub fn from_record(record: &SpeciesRecord) -> Self {
        Self {
            scientific_name: record.scientific_name.clone(),
            common_name: record.common_name.clone(),
            kingdom: Some(record.kingdom),
            total_population: record.total_population,
            image: record.image.clone(),
            description: record.description.clone(),
        }
    }

    pub fn scientific_name(mut self, name: impl Into<String>) -> Self {
        self.scientific_name = name.into();
        self
    }

    pub fn common_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = Some(name.into());
        self
    }

    pub fn kingdom(mut self, kingdom: Kingdom) -> Self {
        self.kingdom = Some(kingdom);
        self
    }

    pub fn total_population(mut self, population: i64) -> Self {
        self.total_population = Some(population);
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Apply an event published by the search workflow
    pub fn apply(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::ImageFound(url) => self.image = Some(url),
            SearchEvent::DescriptionFound(text) => self.description = Some(text),
        }
    }

    /// Validate the draft into an insertable record owned by `author`
    pub fn validate(&self, author: &str) -> Result<NewSpeciesRecord, DraftError> {
        let scientific_name = self.scientific_name.trim();
        if scientific_name.is_empty() {
            return Err(DraftError::MissingScientificName);
        }

        let kingdom = self.kingdom.ok_or(DraftError::MissingKingdom)?;

        if let Some(population) = self.total_population {
            if population < 0 {
                return Err(DraftError::NegativePopulation(population));
            }
        }

        let image = non_empty(self.image.as_deref());
        if let Some(image) = &image {
            validate_image_url(image)?;
        }

        Ok(NewSpeciesRecord {
            scientific_name: scientific_name.to_string(),
            common_name: non_empty(self.common_name.as_deref()),
            image,
            description: non_empty(self.description.as_deref()),
            total_population: self.total_population,
            kingdom,
            author: author.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate_image_url(image: &str) -> Result<(), DraftError> {
    let url = url::Url::parse(image).map_err(|e| DraftError::InvalidImageUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DraftError::InvalidImageUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Reasons a draft cannot be saved
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("Scientific name is required")]
    MissingScientificName,

    #[error("Kingdom is required")]
    MissingKingdom,

    #[error("Total population cannot be negative: {0}")]
    NegativePopulation(i64),

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lion() -> RecordDraft {
        RecordDraft::new()
            .scientific_name("  Panthera leo ")
            .kingdom(Kingdom::Animalia)
    }

    #[test]
    fn test_validate_trims_and_nulls_blanks() {
        let draft = lion().common_name("   ").description(" A big cat. ");
        let record = draft.validate("user-1").unwrap();

        assert_eq!(record.scientific_name, "Panthera leo");
        assert_eq!(record.common_name, None);
        assert_eq!(record.description.as_deref(), Some("A big cat."));
        assert_eq!(record.author, "user-1");
    }

    #[test]
    fn test_validate_requires_name_and_kingdom() {
        let missing_name = RecordDraft::new().kingdom(Kingdom::Plantae);
        assert_eq!(
            missing_name.validate("u"),
            Err(DraftError::MissingScientificName)
        );

        let missing_kingdom = RecordDraft::new().scientific_name("Quercus robur");
        assert_eq!(missing_kingdom.validate("u"), Err(DraftError::MissingKingdom));
    }

    #[test]
    fn test_validate_population_and_image() {
        assert_eq!(
            lion().total_population(-3).validate("u"),
            Err(DraftError::NegativePopulation(-3))
        );
        assert!(matches!(
            lion().image("not a url").validate("u"),
            Err(DraftError::InvalidImageUrl(_))
        ));
        assert!(matches!(
            lion().image("ftp://example.org/lion.png").validate("u"),
            Err(DraftError::InvalidImageUrl(_))
        ));
        assert!(lion()
            .image("https://upload.wikimedia.org/lion.jpg")
            .total_population(0)
            .validate("u")
            .is_ok());
    }

    #[test]
    fn test_apply_search_events() {
        let mut draft = lion();
        draft.apply(SearchEvent::ImageFound("https://img/lion.jpg".to_string()));
        draft.apply(SearchEvent::DescriptionFound("The lion.".to_string()));

        assert_eq!(draft.image.as_deref(), Some("https://img/lion.jpg"));
        assert_eq!(draft.description.as_deref(), Some("The lion."));
    }

    #[test]
    fn test_from_record_round_trips_fields() {
        let record = SpeciesRecord {
            id: 3,
            scientific_name: "Ursus arctos".to_string(),
            common_name: Some("Brown bear".to_string()),
            image: None,
            description: Some("Large bear.".to_string()),
            total_population: Some(200_000),
            kingdom: Kingdom::Animalia,
            author: "owner".to_string(),
        };

        let draft = RecordDraft::from_record(&record);
        let payload = draft.validate(&record.author).unwrap();
        assert_eq!(SpeciesRecord::from_new(record.id, payload), record);
    }
}
