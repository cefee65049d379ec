//! API Router with Swagger UI

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{LogEntry, LogFilter, LogStats, NamedCount, PlantBio, PlantDetails, PlantView, SeasonName, UserRole};
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{
    auth_middleware, optional_auth_middleware, require_admin, AuthState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::upload::{self, UploadState, MAX_UPLOAD_BODY};
use crate::interfaces::http::modules::{auth, health, logs, plants, seasons};
use crate::interfaces::http::state::AppState;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        auth::update_profile,
        auth::change_password,
        auth::logout,
        auth::list_users,
        // Plants
        plants::list_plants,
        plants::get_plant,
        plants::view_plant,
        plants::download_qr,
        plants::create_plant,
        plants::update_plant,
        plants::delete_plant,
        plants::dashboard_plants,
        // Activity
        logs::record_event,
        logs::list_logs,
        logs::log_stats,
        // Seasons
        seasons::list_seasons,
        seasons::get_season,
    ),
    components(
        schemas(
            ApiResponse<EmptyData>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::RegisterRequest,
            auth::UpdateProfileRequest,
            auth::ChangePasswordRequest,
            UserRole,
            plants::PlantRequest,
            plants::DeleteResponse,
            PlantBio,
            PlantDetails,
            PlantView,
            SeasonName,
            logs::RecordEventRequest,
            LogEntry,
            LogFilter,
            LogStats,
            NamedCount,
            seasons::SeasonResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Login, account registration, profile and password"),
        (name = "Plants", description = "Plant biographies: gallery, display page, QR codes, authoring"),
        (name = "Activity", description = "Activity log: record events, browse, aggregate"),
        (name = "Seasons", description = "The seven indigenous seasons"),
    ),
    info(
        title = "Plant Biography API",
        version = "1.0.0",
        description = "REST API for the plant biography catalogue",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let middleware_state = AuthState {
        jwt_config: state.jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/password", put(auth::change_password))
        .route("/logout", post(auth::logout))
        .route(
            "/users",
            get(auth::list_users).route_layer(middleware::from_fn(require_admin)),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // Plant routes (public, caller attached when a token is sent)
    let plant_routes = Router::new()
        .route("/", get(plants::list_plants))
        .route("/{id}", get(plants::get_plant))
        .route("/{id}/view", get(plants::view_plant))
        .route("/{id}/qr.png", get(plants::download_qr))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            optional_auth_middleware,
        ))
        .with_state(state.clone());

    // Plant routes (protected)
    let plant_protected_routes = Router::new()
        .route("/", post(plants::create_plant))
        .route("/{id}", put(plants::update_plant).delete(plants::delete_plant))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    let dashboard_routes = Router::new()
        .route("/plants", get(plants::dashboard_plants))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // Activity log routes (anyone may record)
    let log_routes = Router::new()
        .route("/", post(logs::record_event))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            optional_auth_middleware,
        ))
        .with_state(state.clone());

    let log_protected_routes = Router::new()
        .route(
            "/",
            get(logs::list_logs).route_layer(middleware::from_fn(require_admin)),
        )
        .route("/stats", get(logs::log_stats))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(state.clone());

    let season_routes = Router::new()
        .route("/", get(seasons::list_seasons))
        .route("/{name}", get(seasons::get_season));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Plants
        .nest("/api/v1/plants", plant_routes)
        .nest("/api/v1/plants", plant_protected_routes)
        .nest("/api/v1/dashboard", dashboard_routes)
        // Activity
        .nest("/api/v1/logs", log_routes)
        .nest("/api/v1/logs", log_protected_routes)
        // Seasons
        .nest("/api/v1/seasons", season_routes)
        .with_state(state)
        // Middleware
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Router for the standalone upload proxy.
///
/// Browsers are only let in from `allowed_origin`.
pub fn create_upload_router(state: UploadState, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/upload-image", post(upload::upload_image))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::crypto::JwtConfig;
    use crate::infrastructure::media::{MediaUploader, UploadError};
    use crate::infrastructure::RecordStore;

    async fn app() -> Router {
        let state = AppState::new(
            RecordStore::in_memory(),
            JwtConfig::default(),
            "https://plants.example.org",
        );
        state.identity.seed_demo_accounts().await.unwrap();
        create_api_router(state)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp: Response = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn login(app: &Router, email: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({"email": email, "password": password}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    fn plant_body(common: &str) -> Value {
        json!({
            "family": "Proteaceae",
            "botanicalName": "Telopea speciosissima",
            "commonName": common,
            "indigenousSeason": "Guling",
            "images": ["https://img.example.org/waratah.jpg"]
        })
    }

    #[tokio::test]
    async fn login_issues_a_token_and_rejects_bad_credentials() {
        let app = app().await;
        let token = login(&app, "admin@kangan.edu.au", "admin123").await;

        let (status, body) = send(&app, get("/api/v1/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], "admin-demo-1");
        assert_eq!(body["data"]["role"], "admin");
        assert!(body["data"].get("password").is_none());

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({"email": "admin@kangan.edu.au", "password": "wrong"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = app().await;
        let (status, _) = send(&app, get("/api/v1/auth/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get("/api/v1/auth/me", Some("garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            json_request("POST", "/api/v1/plants", None, plant_body("Waratah")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn only_admins_register_accounts() {
        let app = app().await;
        let student = login(&app, "student@kangan.edu.au", "student123").await;
        let admin = login(&app, "admin@kangan.edu.au", "admin123").await;
        let new_user = json!({
            "email": "new@kangan.edu.au",
            "password": "secret1",
            "name": "New Student"
        });

        let (status, _) = send(
            &app,
            json_request("POST", "/api/v1/auth/register", Some(&student), new_user.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/auth/register", Some(&admin), new_user.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["role"], "student");

        let (status, _) = send(
            &app,
            json_request("POST", "/api/v1/auth/register", Some(&admin), new_user),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        login(&app, "new@kangan.edu.au", "secret1").await;
    }

    #[tokio::test]
    async fn profile_update_returns_a_token_with_the_new_name() {
        let app = app().await;
        let token = login(&app, "student@kangan.edu.au", "student123").await;

        let (status, body) = send(
            &app,
            json_request("PUT", "/api/v1/auth/profile", Some(&token), json!({"name": "Renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let fresh = body["data"]["token"].as_str().unwrap();

        let (_, me) = send(&app, get("/api/v1/auth/me", Some(fresh))).await;
        assert_eq!(me["data"]["name"], "Renamed");
        assert_eq!(me["data"]["email"], "student@kangan.edu.au");
    }

    #[tokio::test]
    async fn wrong_current_password_is_400() {
        let app = app().await;
        let token = login(&app, "student@kangan.edu.au", "student123").await;

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                "/api/v1/auth/password",
                Some(&token),
                json!({"currentPassword": "nope", "newPassword": "newsecret"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Current password is incorrect");

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                "/api/v1/auth/password",
                Some(&token),
                json!({"currentPassword": "student123", "newPassword": "newsecret"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        login(&app, "student@kangan.edu.au", "newsecret").await;
    }

    #[tokio::test]
    async fn plant_lifecycle_over_http() {
        let app = app().await;
        let student = login(&app, "student@kangan.edu.au", "student123").await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/plants", Some(&student), plant_body("Waratah")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["studentId"], "student-demo-1");

        let (status, body) = send(&app, get("/api/v1/plants?search=wara&season=guling", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, get(&format!("/api/v1/plants/{}/view", id), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["imageUrl"], "https://img.example.org/waratah.jpg");

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/v1/plants/{}", id),
                Some(&student),
                plant_body("Red Waratah"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["commonName"], "Red Waratah");

        let mut req = get(&format!("/api/v1/plants/{}", id), Some(&student));
        *req.method_mut() = Method::DELETE;
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["deleted"], true);

        let (status, _) = send(&app, get(&format!("/api/v1/plants/{}", id), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn plant_form_requires_names() {
        let app = app().await;
        let token = login(&app, "student@kangan.edu.au", "student123").await;
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/plants",
                Some(&token),
                json!({"commonName": "Waratah"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("family is required"));
    }

    #[tokio::test]
    async fn qr_download_is_a_png() {
        let app = app().await;
        let token = login(&app, "student@kangan.edu.au", "student123").await;
        let (_, body) = send(
            &app,
            json_request("POST", "/api/v1/plants", Some(&token), plant_body("Waratah")),
        )
        .await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let resp = app
            .clone()
            .oneshot(get(&format!("/api/v1/plants/{}/qr.png", id), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/png");
        assert!(resp.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("Waratah_QRCode.png"));
    }

    #[tokio::test]
    async fn unknown_season_filter_is_400() {
        let app = app().await;
        let (status, _) = send(&app, get("/api/v1/plants?season=Winter", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logs_are_admin_only_and_stats_hide_students_from_students() {
        let app = app().await;
        let student = login(&app, "student@kangan.edu.au", "student123").await;
        let admin = login(&app, "admin@kangan.edu.au", "admin123").await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/logs", None, json!({"action": "page_view", "page": "home"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["data"].get("userId").is_none());

        let (status, _) = send(&app, get("/api/v1/logs", Some(&student))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, get("/api/v1/logs?filter=page_view&limit=5", Some(&admin))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, stats) = send(&app, get("/api/v1/logs/stats", Some(&admin))).await;
        assert_eq!(stats["data"]["pageViews"]["home"], 1);
        assert!(!stats["data"]["studentActivity"].as_object().unwrap().is_empty());

        let (_, stats) = send(&app, get("/api/v1/logs/stats", Some(&student))).await;
        assert!(stats["data"]["studentActivity"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn seasons_are_served_by_name() {
        let app = app().await;
        let (status, body) = send(&app, get("/api/v1/seasons", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 7);

        let (status, body) = send(&app, get("/api/v1/seasons/buarth%20gurru", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["period"], "November");

        let (status, _) = send(&app, get("/api/v1/seasons/Summer", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app().await;
        let (status, body) = send(&app, get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    struct FakeUploader {
        configured: bool,
        fail: bool,
    }

    #[async_trait]
    impl MediaUploader for FakeUploader {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn upload(&self, _image_data: &str, folder: Option<&str>) -> Result<String, UploadError> {
            if self.fail {
                return Err(UploadError::MissingUrl);
            }
            Ok(format!("https://media.example.org/{}/img.png", folder.unwrap_or("root")))
        }
    }

    fn upload_app(configured: bool, fail: bool, secret: Option<&str>) -> Router {
        create_upload_router(
            UploadState {
                uploader: Arc::new(FakeUploader { configured, fail }),
                upload_secret: secret.map(String::from),
            },
            HeaderValue::from_static("http://localhost:5173"),
        )
    }

    fn upload_request(secret: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/upload-image")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(secret) = secret {
            builder = builder.header(upload::UPLOAD_SECRET_HEADER, secret);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn upload_checks_run_in_order() {
        let image = json!({"imageData": "data:image/png;base64,AAAA", "folder": "plants"});

        let (status, body) = send(
            &upload_app(false, false, Some("s3cret")),
            upload_request(Some("wrong"), image.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Unauthorized"}));

        let (status, body) = send(
            &upload_app(false, false, Some("s3cret")),
            upload_request(Some("s3cret"), image.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Cloudinary not configured on server");

        let (status, body) = send(&upload_app(true, false, None), upload_request(None, json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing imageData");

        let (status, body) = send(&upload_app(true, true, None), upload_request(None, image.clone())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Upload failed");

        let (status, body) = send(&upload_app(true, false, None), upload_request(None, image)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"url": "https://media.example.org/plants/img.png"}));
    }

    fn bare_upload_request(secret: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/upload-image");
        if let Some(secret) = secret {
            builder = builder.header(upload::UPLOAD_SECRET_HEADER, secret);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn upload_secret_is_checked_before_the_body_is_read() {
        let app = upload_app(true, false, Some("s3cret"));

        let (status, body) = send(&app, bare_upload_request(None, "")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Unauthorized"}));

        let (status, body) = send(&app, bare_upload_request(Some("wrong"), "{not json")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Unauthorized"}));

        let (status, body) = send(&upload_app(false, false, Some("s3cret")), bare_upload_request(Some("s3cret"), "")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Cloudinary not configured on server"}));
    }

    #[tokio::test]
    async fn empty_or_malformed_upload_body_is_missing_image_data() {
        let app = upload_app(true, false, Some("s3cret"));

        for raw in ["", "{not json", "[1, 2]"] {
            let (status, body) = send(&app, bare_upload_request(Some("s3cret"), raw)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", raw);
            assert_eq!(body, json!({"error": "Missing imageData"}));
        }

        let (status, body) = send(&app, bare_upload_request(Some("s3cret"), r#"{"imageData": "data:image/png;base64,AAAA"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"url": "https://media.example.org/root/img.png"}));
    }
}
