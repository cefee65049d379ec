//! Plant catalogue DTOs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{DomainError, PlantDetails, PlantQuery, SeasonName};

/// Authoring form body: every editable field of a biography.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlantRequest {
    #[serde(flatten)]
    pub details: PlantDetails,
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::Owned(format!("{} is required", field)));
        errors.add(field, err);
    }
}

impl Validate for PlantRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "family", &self.details.family);
        required(&mut errors, "botanicalName", &self.details.botanical_name);
        required(&mut errors, "commonName", &self.details.common_name);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlantSearchParams {
    /// Case-insensitive match on common name, botanical name or family
    pub search: Option<String>,
    /// Indigenous season name, e.g. `Buarth Gurru`
    pub season: Option<String>,
}

impl TryFrom<PlantSearchParams> for PlantQuery {
    type Error = DomainError;

    fn try_from(p: PlantSearchParams) -> Result<Self, Self::Error> {
        let season = match p.season.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(name) => Some(name.parse::<SeasonName>()?),
        };
        Ok(PlantQuery {
            search: p.search.filter(|s| !s.trim().is_empty()),
            season,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    /// `false` when no record had that id
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_requires_the_three_names() {
        let req: PlantRequest = serde_json::from_value(serde_json::json!({
            "commonName": "Waratah",
            "indigenousSeason": "Guling"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("family"));
        assert!(fields.contains_key("botanicalName"));
        assert!(!fields.contains_key("commonName"));
    }

    #[test]
    fn season_filter_parses_and_all_means_none() {
        let q = PlantQuery::try_from(PlantSearchParams {
            search: Some("  ".into()),
            season: Some("buarth gurru".into()),
        })
        .unwrap();
        assert_eq!(q.season, Some(SeasonName::BuarthGurru));
        assert!(q.search.is_none());

        let all = PlantQuery::try_from(PlantSearchParams {
            search: None,
            season: Some("all".into()),
        })
        .unwrap();
        assert!(all.season.is_none());

        assert!(PlantQuery::try_from(PlantSearchParams {
            search: None,
            season: Some("Winter".into()),
        })
        .is_err());
    }
}
