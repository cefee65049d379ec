//! Plant catalogue API handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{DeleteResponse, PlantRequest, PlantSearchParams};
use crate::domain::{PlantBio, PlantQuery, PlantView};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ClientIp};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/plants",
    tag = "Plants",
    params(PlantSearchParams),
    responses(
        (status = 200, description = "Matching biographies", body = ApiResponse<Vec<PlantBio>>),
        (status = 400, description = "Unknown season")
    )
)]
pub async fn list_plants(
    State(state): State<AppState>,
    Query(params): Query<PlantSearchParams>,
) -> ApiResult<Vec<PlantBio>> {
    let query = PlantQuery::try_from(params)?;
    let plants = state.plants.search(&query).await?;
    Ok(Json(ApiResponse::success(plants)))
}

#[utoipa::path(
    get,
    path = "/api/v1/plants/{id}",
    tag = "Plants",
    params(("id" = String, Path, description = "Plant id")),
    responses(
        (status = 200, description = "Stored biography", body = ApiResponse<PlantBio>),
        (status = 404, description = "No such plant")
    )
)]
pub async fn get_plant(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PlantBio> {
    Ok(Json(ApiResponse::success(state.plants.get(&id).await?)))
}

/// Public display page data. Counts as a plant view.
#[utoipa::path(
    get,
    path = "/api/v1/plants/{id}/view",
    tag = "Plants",
    params(("id" = String, Path, description = "Plant id")),
    responses(
        (status = 200, description = "Display projection", body = ApiResponse<PlantView>),
        (status = 404, description = "No such plant")
    )
)]
pub async fn view_plant(
    State(state): State<AppState>,
    auth: Option<Extension<AuthenticatedUser>>,
    ClientIp(ip): ClientIp,
    Path(id): Path<String>,
) -> ApiResult<PlantView> {
    let viewer = auth.as_ref().map(|Extension(a)| &a.user);
    let view = state.plants.display(&id, viewer, ip).await?;
    Ok(Json(ApiResponse::success(view)))
}

#[utoipa::path(
    get,
    path = "/api/v1/plants/{id}/qr.png",
    tag = "Plants",
    params(("id" = String, Path, description = "Plant id")),
    responses(
        (status = 200, description = "QR code pointing at the display page", content_type = "image/png"),
        (status = 404, description = "No such plant")
    )
)]
pub async fn download_qr(
    State(state): State<AppState>,
    auth: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let actor = auth.as_ref().map(|Extension(a)| &a.user);
    let qr = state.plants.qr_png(&id, actor).await?;

    let disposition = format!("attachment; filename=\"{}\"", qr.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        qr.png,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/plants",
    tag = "Plants",
    request_body = PlantRequest,
    responses(
        (status = 201, description = "Biography created", body = ApiResponse<PlantBio>),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Missing required names")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_plant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<PlantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlantBio>>), ApiError> {
    let plant = state.plants.save(&auth.user, None, request.details).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(plant))))
}

/// Replaces the record in place. An unknown id creates it under that id.
#[utoipa::path(
    put,
    path = "/api/v1/plants/{id}",
    tag = "Plants",
    params(("id" = String, Path, description = "Plant id")),
    request_body = PlantRequest,
    responses(
        (status = 200, description = "Biography saved", body = ApiResponse<PlantBio>),
        (status = 403, description = "Only the author or an admin can edit")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_plant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<PlantRequest>,
) -> ApiResult<PlantBio> {
    let plant = state.plants.save(&auth.user, Some(&id), request.details).await?;
    Ok(Json(ApiResponse::success(plant)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/plants/{id}",
    tag = "Plants",
    params(("id" = String, Path, description = "Plant id")),
    responses(
        (status = 200, description = "Deleted, or nothing to delete", body = ApiResponse<DeleteResponse>),
        (status = 403, description = "Only the author or an admin can delete")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_plant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    let deleted = state.plants.delete(&auth.user, &id).await?;
    Ok(Json(ApiResponse::success(DeleteResponse { deleted })))
}

/// Admins get every record, students their own.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/plants",
    tag = "Plants",
    responses(
        (status = 200, description = "Records the caller manages", body = ApiResponse<Vec<PlantBio>>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn dashboard_plants(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<PlantBio>> {
    Ok(Json(ApiResponse::success(state.plants.dashboard(&auth.user).await?)))
}
