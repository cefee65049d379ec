//! Indigenous season reference data

use axum::{extract::Path, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{IndigenousSeason, SeasonName, INDIGENOUS_SEASONS};
use crate::interfaces::http::common::{ApiResponse, ApiResult};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonResponse {
    pub name: String,
    pub period: String,
    pub description: String,
    pub weather: String,
    pub plant_indicators: String,
    pub animal_behavior: String,
}

impl From<&IndigenousSeason> for SeasonResponse {
    fn from(s: &IndigenousSeason) -> Self {
        Self {
            name: s.name.to_string(),
            period: s.period.to_string(),
            description: s.description.to_string(),
            weather: s.weather.to_string(),
            plant_indicators: s.plant_indicators.to_string(),
            animal_behavior: s.animal_behavior.to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/seasons",
    tag = "Seasons",
    responses(
        (status = 200, description = "All seven seasons in calendar order", body = ApiResponse<Vec<SeasonResponse>>)
    )
)]
pub async fn list_seasons() -> ApiResult<Vec<SeasonResponse>> {
    Ok(Json(ApiResponse::success(
        INDIGENOUS_SEASONS.iter().map(SeasonResponse::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/seasons/{name}",
    tag = "Seasons",
    params(("name" = String, Path, description = "Season name, case-insensitive")),
    responses(
        (status = 200, description = "One season", body = ApiResponse<SeasonResponse>),
        (status = 400, description = "Unknown season")
    )
)]
pub async fn get_season(Path(name): Path<String>) -> ApiResult<SeasonResponse> {
    let season: SeasonName = name.parse()?;
    Ok(Json(ApiResponse::success(season.info().into())))
}
