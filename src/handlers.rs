use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};

use crate::{
    auth::AuthUser,
    config::AppConfig,
    cookies::{ROLE_COOKIE_NAME, SESSION_COOKIE_NAME, expired_cookie},
    error::AppError,
    models::{ErrorResponse, LogoutResponse, SessionProfile},
};

// --- Handlers ---

/// health
///
/// [Public Route] Liveness check for load balancers.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// logout
///
/// [Public Route] Clears the session. Always expires both `tulip_auth` and the
/// legacy `tulip_role` cookie, whether or not the caller had a session, so
/// repeated calls produce the same response.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookies cleared", body = LogoutResponse),
        (status = 500, description = "Internal fault", body = ErrorResponse)
    )
)]
pub async fn logout(State(config): State<AppConfig>) -> Result<impl IntoResponse, AppError> {
    let mut headers = HeaderMap::new();
    for name in [SESSION_COOKIE_NAME, ROLE_COOKIE_NAME] {
        headers.append(SET_COOKIE, expired_cookie(name, config.env)?);
    }

    let body = LogoutResponse {
        success: true,
        message: "Logged out".to_string(),
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

/// get_session
///
/// [Authenticated Route] Describes the current session from the verified token.
/// Any invalid or missing session yields a bare 401.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Active session", body = SessionProfile),
        (status = 401, description = "No valid session")
    )
)]
pub async fn get_session(AuthUser { claims }: AuthUser) -> Result<Json<SessionProfile>, StatusCode> {
    // `exp` already passed verification, so it is a sane timestamp.
    let expires_at = claims.expires_at().ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(Json(SessionProfile {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        expires_at,
    }))
}
