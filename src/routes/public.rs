use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints under `/api` that any client may call. The `/api` namespace is
/// excluded from the session gate, so no redirects happen here.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /api/health
        .route("/api/health", get(handlers::health))
        // POST /api/auth/logout
        // Idempotent: always clears both session cookies.
        .route("/api/auth/logout", post(handlers::logout))
}
