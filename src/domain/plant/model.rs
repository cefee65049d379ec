use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{SeasonName, SessionUser};

/// A plant biography as stored in the `plants` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantBio {
    pub id: String,
    #[serde(flatten)]
    pub details: PlantDetails,
    pub student_id: String,
    pub student_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Rendered QR code (PNG data URI) pointing at the public display page.
    #[serde(default)]
    pub qr_code: String,
}

impl PlantBio {
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.student_id == user_id
    }

    /// Case-insensitive substring match over common name, botanical name and family.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &self.details.common_name,
            &self.details.botanical_name,
            &self.details.family,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// The author-editable part of a plant biography: everything the authoring
/// form submits.
///
/// The text fields are free-form and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantDetails {
    pub family: String,
    pub botanical_name: String,
    pub common_name: String,
    pub habit_growth_characteristics: String,
    pub life_cycle: String,
    pub identifying_characteristics: String,
    /// Leaves, stem and meristems in one text blob.
    pub leaves_stems_memristems: String,
    pub flowers: String,
    pub flowering_time_season: String,
    pub fruit_seed: String,
    pub seed_collection_time_season: String,
    pub additional_propagation_requirements: String,
    pub trunk: String,
    pub root_system: String,
    pub vascular_system: String,
    pub additional_information: String,
    pub spotting_characteristics: String,
    pub family_level: String,
    pub cultural_information_and_uses: String,
    pub references: String,
    pub horticultural_landscape_info: String,
    pub ethnobotanical_information_uses: String,
    pub indigenous_season: SeasonName,
    pub images: Vec<String>,
}

/// Author stamp applied when a biography is saved.
#[derive(Debug, Clone)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl From<&SessionUser> for Author {
    fn from(u: &SessionUser) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
        }
    }
}

/// Gallery query: free-text search plus an optional season filter.
#[derive(Debug, Clone, Default)]
pub struct PlantQuery {
    pub search: Option<String>,
    pub season: Option<SeasonName>,
}

impl PlantQuery {
    pub fn matches(&self, plant: &PlantBio) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |term| plant.matches_search(term));
        let season_ok = self
            .season
            .map_or(true, |season| plant.details.indigenous_season == season);
        search_ok && season_ok
    }
}
