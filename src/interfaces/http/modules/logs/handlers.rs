//! Activity log API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{LogListParams, RecordEventRequest};
use crate::application::activity::DEFAULT_LIST_LIMIT;
use crate::domain::{LogEntry, LogStats, NewLogEntry};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ClientIp};
use crate::interfaces::http::state::AppState;

/// Anonymous callers may record too; a valid token attaches the user.
#[utoipa::path(
    post,
    path = "/api/v1/logs",
    tag = "Activity",
    request_body = RecordEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = ApiResponse<LogEntry>),
        (status = 422, description = "Missing action or page")
    )
)]
pub async fn record_event(
    State(state): State<AppState>,
    auth: Option<Extension<AuthenticatedUser>>,
    ClientIp(ip): ClientIp,
    ValidatedJson(request): ValidatedJson<RecordEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LogEntry>>), ApiError> {
    let event = NewLogEntry::from(request)
        .by_opt(auth.as_ref().map(|Extension(a)| &a.user))
        .from_ip(ip);
    let entry = state.activity.record(event).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry))))
}

#[utoipa::path(
    get,
    path = "/api/v1/logs",
    tag = "Activity",
    params(LogListParams),
    responses(
        (status = 200, description = "Newest-first entries", body = ApiResponse<Vec<LogEntry>>),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogListParams>,
) -> ApiResult<Vec<LogEntry>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let entries = state.activity.list(params.filter, limit).await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// Per-user activity is only shown to admins.
#[utoipa::path(
    get,
    path = "/api/v1/logs/stats",
    tag = "Activity",
    responses(
        (status = 200, description = "Aggregates over the retained log", body = ApiResponse<LogStats>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn log_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<LogStats> {
    let mut stats = state.activity.aggregate().await?;
    if !auth.is_admin() {
        stats.student_activity.clear();
    }
    Ok(Json(ApiResponse::success(stats)))
}
