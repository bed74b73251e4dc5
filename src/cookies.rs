use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};

use crate::config::Env;

/// Authoritative session cookie. Carries the signed session token.
pub const SESSION_COOKIE_NAME: &str = "tulip_auth";

/// Legacy mirror of the role as plain text. Kept only so logout can clear it for
/// clients that still read it; the gate never derives a decision from it.
pub const ROLE_COOKIE_NAME: &str = "tulip_role";

/// Look up a cookie value by name across every `Cookie` header on the request.
///
/// Returns `None` when the cookie is missing or its value is empty.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Build a `Set-Cookie` value that tells the client to drop `name` immediately.
///
/// Attributes match the ones the login service sets, otherwise browsers keep the
/// original cookie alongside the expired one.
pub fn expired_cookie(name: &str, env: Env) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if env.secure_cookies() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
