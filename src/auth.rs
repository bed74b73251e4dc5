use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cookies::{SESSION_COOKIE_NAME, read_cookie},
    models::Role,
};

/// Claims
///
/// The payload the external login service signs into the `tulip_auth` cookie.
/// Read-only to this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user identifier assigned by the login service.
    pub sub: String,
    pub email: String,
    /// Closed role enum. Unknown strings fail decoding.
    pub role: Role,
    /// Issued At (iat), unix seconds.
    pub iat: i64,
    /// Expiration Time (exp), unix seconds. The token is valid strictly before it.
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// SessionRejection
///
/// Why a session cookie was not accepted. Only ever logged; callers of
/// [`SessionVerifier::verify`] see a plain `None` regardless of the cause.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionRejection {
    #[error("no session secret configured")]
    MissingSecret,
    #[error("session cookie absent")]
    MissingCookie,
    #[error("session token signature mismatch")]
    BadSignature,
    #[error("session token expired")]
    Expired,
    #[error("session token malformed: {0}")]
    Malformed(String),
}

/// SessionVerifier
///
/// Validates `tulip_auth` tokens against the single shared secret. Built once at
/// startup from AppConfig and shared immutably across requests.
#[derive(Clone)]
pub struct SessionVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: Option<&SecretString>) -> Self {
        let key = secret.map(|secret| DecodingKey::from_secret(secret.expose_secret().as_bytes()));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.validate_aud = false;

        Self { key, validation }
    }

    /// Returns the verified claims, or `None` for every kind of invalid session.
    pub fn verify(&self, cookie: Option<&str>) -> Option<Claims> {
        match self.check(cookie) {
            Ok(claims) => Some(claims),
            Err(reason) => {
                tracing::debug!(%reason, "session rejected");
                None
            }
        }
    }

    /// Same as [`verify`](Self::verify) but exposes the rejection cause.
    /// Intended for diagnostics and tests, never for building a response.
    pub fn check(&self, cookie: Option<&str>) -> Result<Claims, SessionRejection> {
        let key = self.key.as_ref().ok_or(SessionRejection::MissingSecret)?;

        let token = cookie
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(SessionRejection::MissingCookie)?;

        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => SessionRejection::BadSignature,
                ErrorKind::ExpiredSignature => SessionRejection::Expired,
                _ => SessionRejection::Malformed(e.to_string()),
            })?
            .claims;

        // The library accepts `exp == now`; a session is only valid strictly before expiry.
        if claims.exp <= Utc::now().timestamp() {
            return Err(SessionRejection::Expired);
        }

        Ok(claims)
    }
}

/// AuthUser
///
/// The resolved identity of a request carrying a valid `tulip_auth` cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

/// AuthUser Extractor Implementation
///
/// Lets API handlers require a verified session. Reads the cookie, verifies it
/// with the shared SessionVerifier and rejects with 401 on any failure. The
/// rejection never says which check failed.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionVerifier: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = SessionVerifier::from_ref(state);

        verifier
            .verify(read_cookie(&parts.headers, SESSION_COOKIE_NAME))
            .map(|claims| AuthUser { claims })
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
