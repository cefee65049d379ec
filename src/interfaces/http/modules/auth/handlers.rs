//! Authentication API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::error;

use super::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest,
    UserInfo, UsersQuery,
};
use crate::domain::{actions, DomainError, NewLogEntry, SessionUser, UpdateProfile};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, ClientIp};
use crate::interfaces::http::state::AppState;

const PROFILE_PAGE: &str = "profile";

fn issue_token(user: SessionUser, jwt_config: &JwtConfig) -> Result<LoginResponse, ApiError> {
    let token = create_token(&user, jwt_config).map_err(|e| {
        error!(error = %e, "Failed to sign token");
        ApiError(DomainError::Storage(e.to_string()))
    })?;

    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_config.expiration_hours * 3600,
        user: user.into(),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = SessionUser::from(state.identity.login(&request.email, &request.password).await?);

    state
        .activity
        .record_quietly(NewLogEntry::new(actions::USER_LOGIN, "login").by(&user).from_ip(ip))
        .await;

    Ok(Json(ApiResponse::success(issue_token(user, &state.jwt_config)?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserInfo>),
        (status = 403, description = "Only admins can register users"),
        (status = 409, description = "User with this email already exists"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let user = state.identity.register_as(&auth.user, request.into()).await?;

    state
        .activity
        .record_quietly(NewLogEntry::new(actions::USER_CREATED, "register").by(&auth.user))
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(Extension(auth): Extension<AuthenticatedUser>) -> ApiResult<UserInfo> {
    Ok(Json(ApiResponse::success(auth.user.into())))
}

/// Returns a fresh token, since the old one still carries the old name and email.
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<LoginResponse>),
        (status = 404, description = "User no longer exists"),
        (status = 409, description = "Email already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<LoginResponse> {
    let update = UpdateProfile::from(request);
    let user = SessionUser::from(state.identity.update_profile(&auth.user.id, &update).await?);

    state
        .activity
        .record_quietly(NewLogEntry::new(actions::PROFILE_UPDATED, PROFILE_PAGE).by(&user))
        .await;

    Ok(Json(ApiResponse::success(issue_token(user, &state.jwt_config)?)))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    tag = "Authentication",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 400, description = "Current password is incorrect")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<EmptyData> {
    state
        .identity
        .update_password(&auth.user.id, &request.current_password, &request.new_password)
        .await?;

    state
        .activity
        .record_quietly(NewLogEntry::new(actions::PASSWORD_CHANGED, PROFILE_PAGE).by(&auth.user))
        .await;

    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Tokens are stateless; this only records the event.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<EmptyData>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<EmptyData> {
    state
        .activity
        .record_quietly(NewLogEntry::new(actions::USER_LOGOUT, "dashboard").by(&auth.user))
        .await;

    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/users",
    tag = "Authentication",
    params(UsersQuery),
    responses(
        (status = 200, description = "All accounts", body = ApiResponse<Vec<UserInfo>>),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> ApiResult<Vec<UserInfo>> {
    let users = state.identity.list_users(query.role).await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserInfo::from).collect(),
    )))
}
