//! Species record model, mirroring a row of the hosted `species` table.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Taxonomic kingdom of a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kingdom {
    Animalia,
    Plantae,
    Fungi,
    Protista,
    Archaea,
    Bacteria,
}

impl Kingdom {
    /// All kingdoms in display order
    pub const ALL: [Kingdom; 6] = [
        Kingdom::Animalia,
        Kingdom::Plantae,
        Kingdom::Fungi,
        Kingdom::Protista,
        Kingdom::Archaea,
        Kingdom::Bacteria,
    ];

    /// Returns the stored name of the kingdom
    pub fn name(&self) -> &'static str {
        match self {
            Kingdom::Animalia => "Animalia",
            Kingdom::Plantae => "Plantae",
            Kingdom::Fungi => "Fungi",
            Kingdom::Protista => "Protista",
            Kingdom::Archaea => "Archaea",
            Kingdom::Bacteria => "Bacteria",
        }
    }
}

impl std::fmt::Display for Kingdom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Kingdom {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kingdom::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown kingdom: {}", s))
    }
}

/// A persisted species record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    /// Unique identifier assigned by the store
    pub id: i64,

    /// Scientific (binomial) name
    pub scientific_name: String,

    /// Common name
    pub common_name: Option<String>,

    /// Image URL
    pub image: Option<String>,

    /// Free-text description
    pub description: Option<String>,

    /// Estimated total population
    pub total_population: Option<i64>,

    /// Taxonomic kingdom
    pub kingdom: Kingdom,

    /// Identifier of the user who created the record
    pub author: String,
}

impl SpeciesRecord {
    /// Build a stored record from an insert payload and its assigned id
    pub fn from_new(id: i64, new: NewSpeciesRecord) -> Self {
        Self {
            id,
            scientific_name: new.scientific_name,
            common_name: new.common_name,
            image: new.image,
            description: new.description,
            total_population: new.total_population,
            kingdom: new.kingdom,
            author: new.author,
        }
    }

    /// Whether `viewer_id` owns this record and may edit or delete it
    pub fn is_owned_by(&self, viewer_id: &str) -> bool {
        self.author == viewer_id
    }
}

/// Insert/update payload: every column except the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpeciesRecord {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub total_population: Option<i64>,
    pub kingdom: Kingdom,
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kingdom_parse() {
        assert_eq!("animalia".parse::<Kingdom>().unwrap(), Kingdom::Animalia);
        assert_eq!(" Fungi ".parse::<Kingdom>().unwrap(), Kingdom::Fungi);
        assert!("Mineralia".parse::<Kingdom>().is_err());
    }

    #[test]
    fn test_record_deserializes_table_row() {
        let row = r#"{
            "id": 7,
            "scientific_name": "Panthera leo",
            "common_name": "Lion",
            "image": null,
            "description": "The lion is a large cat.",
            "total_population": 23000,
            "kingdom": "Animalia",
            "author": "user-1"
        }"#;

        let record: SpeciesRecord = serde_json::from_str(row).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.kingdom, Kingdom::Animalia);
        assert!(record.image.is_none());
        assert!(record.is_owned_by("user-1"));
        assert!(!record.is_owned_by("user-2"));
    }
}
