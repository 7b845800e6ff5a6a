use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod seed;
pub mod storage;
pub mod validation;

// Routers segregated by access level (public, authenticated).
pub mod routes;
use auth::{AuthAdmin, TokenIssuer};
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use repository::Repository;
pub use storage::{MemoryDocumentStore, PostgresDocumentStore, StorageState};

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers and the schema
/// structs, served at `/api-docs/openapi.json` and browsable under `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_admin, handlers::login_admin, handlers::get_me,
        handlers::list_gallery, handlers::create_gallery_photo, handlers::update_gallery_photo,
        handlers::delete_gallery_photo, handlers::list_achievements, handlers::create_achievement,
        handlers::update_achievement, handlers::delete_achievement, handlers::list_team,
        handlers::create_team_member, handlers::update_team_member, handlers::delete_team_member,
        handlers::list_workshops, handlers::create_workshop, handlers::update_workshop,
        handlers::delete_workshop, handlers::submit_contact, handlers::list_contact_submissions,
        handlers::get_about, handlers::update_about
    ),
    components(
        schemas(
            models::GalleryPhoto, models::GalleryPhotoRequest, models::Achievement,
            models::AchievementRequest, models::TeamMember, models::TeamMemberRequest,
            models::Workshop, models::WorkshopRequest, models::ContactSubmission,
            models::ContactRequest, models::AboutContent, models::AboutUpdateRequest,
            models::AboutResponse, models::AdminCredentials, models::AdminLoginRequest,
            models::AuthResponse, models::AdminProfile, models::MessageResponse,
        )
    ),
    tags(
        (name = "dhadak", description = "Dhadak dance club website API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a request may touch, built once at startup and cloned cheaply per request:
/// the repository over the shared store handle, the read-only token issuer and the
/// immutable configuration. There is no other shared mutable state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub tokens: Arc<TokenIssuer>,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the state from a store handle and the loaded configuration.
    pub fn new(store: StorageState, config: AppConfig) -> Self {
        Self {
            repo: Repository::new(store),
            tokens: Arc::new(TokenIssuer::new(&config.jwt_secret)),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for Repository {
    fn from_ref(app_state: &AppState) -> Repository {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(app_state: &AppState) -> Arc<TokenIssuer> {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// The authorization gate for `authenticated_routes`. Extracting `AuthAdmin` verifies the
/// bearer token; on failure the extractor rejects with 401 and the handler, and therefore
/// any repository call, never runs.
async fn auth_middleware(_admin: AuthAdmin, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing table under `/api`, attaches the gate to the authenticated
/// routes, and wraps everything in request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let x_request_id = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// cors_layer
///
/// `*` opens the API to any origin without credentials. An explicit origin list allows
/// credentials, which rules out wildcards, so methods and headers are mirrored from the
/// preflight instead.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_methods(Any)
            .allow_origin(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// trace_span_logger
///
/// Span for every request, tagged with the `x-request-id` set by the layer above so all
/// log lines of one request correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
