use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core session-gate components and the thin API around them.
pub mod auth;
pub mod config;
pub mod cookies;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;

// Module for routing segregation (Public API, Authenticated API, gated Pages).
pub mod routes;
use routes::{authenticated, public};

// --- Public Re-exports ---

// Makes the state types easily accessible to the main application entry point (main.rs).
pub use auth::SessionVerifier;
pub use config::AppConfig;

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation for the `/api` surface. It aggregates
/// every handler decorated with `#[utoipa::path]` and every schema deriving
/// `utoipa::ToSchema`. The resulting JSON is served at `/api/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all handler functions here for documentation generation.
    paths(handlers::health, handlers::logout, handlers::get_session),
    // List all models (schemas) used in the response bodies.
    components(
        schemas(
            models::Role, models::SessionProfile, models::LogoutResponse,
            models::ErrorResponse,
        )
    ),
    tags(
        (name = "tulip-portal", description = "Tulip portal session API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**: the single, thread-safe, immutable
/// container shared across all incoming requests. There is no mutable state here;
/// every request is decided from its own path and cookie.
#[derive(Clone)]
pub struct AppState {
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
    /// Session Layer: verifies `tulip_auth` tokens against the configured secret.
    pub verifier: SessionVerifier,
}

impl AppState {
    /// new
    ///
    /// Builds the verifier from the configured secret once, at startup. A missing
    /// secret yields a verifier that rejects every token (fail-closed).
    pub fn new(config: AppConfig) -> Self {
        let verifier = SessionVerifier::new(config.session_secret.as_ref());
        Self { config, verifier }
    }
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers and extractors to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for SessionVerifier {
    fn from_ref(app_state: &AppState) -> SessionVerifier {
        app_state.verifier.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies the session gate
/// and the global middleware, and registers the application state.
///
/// `pages` is the frontend router (see `routes::pages::page_routes`); tests can
/// substitute their own.
pub fn create_router(state: AppState, pages: Router<AppState>) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI (under /api, so never gated).
        .merge(SwaggerUi::new("/api/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        // Public API Routes: health check and logout.
        .merge(public::public_routes())
        // Authenticated API Routes: protected by the `AuthUser` extractor in each handler.
        .merge(authenticated::authenticated_routes())
        // Pages: the frontend, including its fallback.
        .merge(pages)
        // 2a. Session Gate: sees every request, fallback included. `/api` and asset
        // paths are skipped inside it; everything else is allowed or redirected.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::session_gate,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a span
                // built by `trace_span_logger`, which carries the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echoes x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (Applied last)
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to build the per-request span. It extracts the
/// `x-request-id` header (if present) and records it alongside the HTTP method and
/// URI, so every log line of one request, gate decisions included, is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    // The structured log format used by the tracing macros.
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
