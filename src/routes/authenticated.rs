use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Every handler here takes `AuthUser`, which rejects with 401 unless the request
/// carries a valid `tulip_auth` cookie.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /api/auth/session
        // Returns the verified claims so the frontend never reads `tulip_role`.
        .route("/api/auth/session", get(handlers::get_session))
}
