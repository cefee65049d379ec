//! Display projection of a plant biography
//!
//! The public display page does not consume the authoring shape directly;
//! it reads a [`PlantView`] built from it.

use serde::Serialize;
use utoipa::ToSchema;

use super::PlantBio;

/// Display-oriented shape of a plant biography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantView {
    pub plant_id: String,
    pub common_name: String,
    pub botanical_name: String,
    /// First stored image, or empty when the record has none.
    pub image_url: String,

    pub leaves: String,
    pub stem: String,
    pub meristems: String,

    pub flower: String,
    pub flower_season: String,

    pub fruit_seed: String,
    pub fruit_seed_season: String,

    pub trunk: String,
    pub root_system: String,
    pub vascular_system: String,

    pub propagation_required: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_comment: Option<String>,
}

impl From<&PlantBio> for PlantView {
    /// The stored record keeps leaves, stem and meristems in one text field.
    /// It is not split: the whole trimmed text goes to `leaves` and the
    /// other two slots stay empty.
    fn from(p: &PlantBio) -> Self {
        let d = &p.details;
        let additional_comment = if d.additional_information.is_empty() {
            None
        } else {
            Some(d.additional_information.clone())
        };

        Self {
            plant_id: p.id.clone(),
            common_name: d.common_name.clone(),
            botanical_name: d.botanical_name.clone(),
            image_url: d.images.first().cloned().unwrap_or_default(),

            leaves: d.leaves_stems_memristems.trim().to_string(),
            stem: String::new(),
            meristems: String::new(),

            flower: d.flowers.clone(),
            flower_season: d.flowering_time_season.clone(),

            fruit_seed: d.fruit_seed.clone(),
            fruit_seed_season: d.seed_collection_time_season.clone(),

            trunk: d.trunk.clone(),
            root_system: d.root_system.clone(),
            vascular_system: d.vascular_system.clone(),

            propagation_required: d.additional_propagation_requirements.clone(),
            additional_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{PlantDetails, SeasonName};

    fn waratah(images: Vec<String>, additional: &str) -> PlantBio {
        PlantBio {
            id: "PLANT-002".into(),
            details: PlantDetails {
                family: "Proteaceae".into(),
                botanical_name: "Telopea speciosissima".into(),
                common_name: "Waratah".into(),
                leaves_stems_memristems: "  Leaves: Oblong\nStem: Woody\nMeristems: Terminal  ".into(),
                flowers: "Large red dome-shaped head".into(),
                flowering_time_season: "Guling to Poorneet (August - October)".into(),
                fruit_seed: "Woody follicle".into(),
                seed_collection_time_season: "Garrawang to Biderap".into(),
                additional_propagation_requirements: "Semi-hardwood cuttings".into(),
                trunk: "Multi-stemmed shrub".into(),
                root_system: "Deep taproot".into(),
                vascular_system: "Ring of vascular bundles".into(),
                additional_information: additional.into(),
                indigenous_season: SeasonName::Guling,
                images,
                ..Default::default()
            },
            student_id: String::new(),
            student_name: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            qr_code: String::new(),
        }
    }

    #[test]
    fn first_image_becomes_display_image() {
        let plant = waratah(vec!["a.jpg".into(), "b.jpg".into()], "");
        assert_eq!(PlantView::from(&plant).image_url, "a.jpg");
    }

    #[test]
    fn no_images_gives_empty_display_image() {
        let plant = waratah(vec![], "");
        assert_eq!(PlantView::from(&plant).image_url, "");
    }

    #[test]
    fn combined_leaf_text_is_not_split() {
        let view = PlantView::from(&waratah(vec![], ""));
        assert_eq!(view.leaves, "Leaves: Oblong\nStem: Woody\nMeristems: Terminal");
        assert_eq!(view.stem, "");
        assert_eq!(view.meristems, "");
    }

    #[test]
    fn season_fields_map_to_display_slots() {
        let view = PlantView::from(&waratah(vec![], "NSW floral emblem"));
        assert_eq!(view.flower, "Large red dome-shaped head");
        assert_eq!(view.flower_season, "Guling to Poorneet (August - October)");
        assert_eq!(view.fruit_seed_season, "Garrawang to Biderap");
        assert_eq!(view.propagation_required, "Semi-hardwood cuttings");
        assert_eq!(view.additional_comment.as_deref(), Some("NSW floral emblem"));
    }

    #[test]
    fn empty_additional_information_is_omitted() {
        let view = PlantView::from(&waratah(vec![], ""));
        assert!(view.additional_comment.is_none());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("additionalComment").is_none());
    }
}
