use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use secrecy::SecretString;
use serde::Serialize;
use tulip_portal::{
    AppConfig, AppState,
    auth::{AuthUser, Claims, SessionRejection, SessionVerifier},
    cookies::{SESSION_COOKIE_NAME, read_cookie},
    models::Role,
};

// --- Helper Functions ---

const TEST_SECRET: &str = "test-secret-value-1234567890";
const OTHER_SECRET: &str = "some-other-secret-value-0987654321";

fn sign<T: Serialize>(claims: &T, secret: &str) -> String {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &key).unwrap()
}

fn claims(role: Role, exp_offset: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: "user-42".to_string(),
        email: "siti@kampus.ac.id".to_string(),
        role,
        iat: now,
        exp: now + exp_offset,
    }
}

fn create_token(role: Role, exp_offset: i64) -> String {
    sign(&claims(role, exp_offset), TEST_SECRET)
}

fn verifier() -> SessionVerifier {
    SessionVerifier::new(Some(&SecretString::from(TEST_SECRET.to_string())))
}

fn create_app_state(secret: Option<&str>) -> AppState {
    let mut config = AppConfig::default();
    config.session_secret = secret.map(|s| SecretString::from(s.to_string()));
    AppState::new(config)
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_session_cookie(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}={token}")).unwrap(),
    );
}

// --- Verifier Tests ---

#[test]
fn test_verify_accepts_valid_token() {
    let token = create_token(Role::Admin, 3600);

    let verified = verifier().verify(Some(token.as_str())).expect("token should verify");

    assert_eq!(verified.sub, "user-42");
    assert_eq!(verified.email, "siti@kampus.ac.id");
    assert_eq!(verified.role, Role::Admin);
}

#[test]
fn test_verify_rejects_when_secret_missing() {
    let token = create_token(Role::Admin, 3600);
    let verifier = SessionVerifier::new(None);

    assert_eq!(verifier.check(Some(token.as_str())), Err(SessionRejection::MissingSecret));
    assert!(verifier.verify(Some(token.as_str())).is_none());
}

#[test]
fn test_verify_rejects_absent_or_empty_cookie() {
    let verifier = verifier();

    assert_eq!(verifier.check(None), Err(SessionRejection::MissingCookie));
    assert_eq!(verifier.check(Some("")), Err(SessionRejection::MissingCookie));
    assert_eq!(verifier.check(Some("   ")), Err(SessionRejection::MissingCookie));
}

#[test]
fn test_verify_rejects_token_signed_with_other_secret() {
    let token = sign(&claims(Role::Admin, 3600), OTHER_SECRET);

    assert_eq!(verifier().check(Some(token.as_str())), Err(SessionRejection::BadSignature));
}

#[test]
fn test_verify_rejects_payload_swapped_under_old_signature() {
    // Student's signature glued onto an admin payload.
    let student = create_token(Role::Student, 3600);
    let admin = create_token(Role::Admin, 3600);
    let student_parts: Vec<&str> = student.split('.').collect();
    let admin_parts: Vec<&str> = admin.split('.').collect();
    let forged = format!("{}.{}.{}", admin_parts[0], admin_parts[1], student_parts[2]);

    assert_eq!(verifier().check(Some(forged.as_str())), Err(SessionRejection::BadSignature));
}

#[test]
fn test_verify_rejects_expired_token() {
    let token = create_token(Role::Student, -60);

    assert_eq!(verifier().check(Some(token.as_str())), Err(SessionRejection::Expired));
}

#[test]
fn test_verify_rejects_token_expiring_now() {
    let token = create_token(Role::Student, 0);

    assert_eq!(verifier().check(Some(token.as_str())), Err(SessionRejection::Expired));
}

#[test]
fn test_verify_rejects_unknown_role() {
    let now = Utc::now().timestamp();
    let token = sign(
        &serde_json::json!({
            "sub": "user-42",
            "email": "dosen@kampus.ac.id",
            "role": "lecturer",
            "iat": now,
            "exp": now + 3600,
        }),
        TEST_SECRET,
    );

    assert!(matches!(
        verifier().check(Some(token.as_str())),
        Err(SessionRejection::Malformed(_))
    ));
    assert!(verifier().verify(Some(token.as_str())).is_none());
}

#[test]
fn test_verify_rejects_garbage() {
    assert!(matches!(
        verifier().check(Some("not-a-token")),
        Err(SessionRejection::Malformed(_))
    ));
}

// --- Cookie Parsing ---

#[test]
fn test_read_cookie_finds_session_among_others() {
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::COOKIE,
        header::HeaderValue::from_static("theme=dark; tulip_auth=abc.def.ghi; tulip_role=admin"),
    );

    assert_eq!(read_cookie(&parts.headers, SESSION_COOKIE_NAME), Some("abc.def.ghi"));
    assert_eq!(read_cookie(&parts.headers, "missing"), None);
}

#[test]
fn test_read_cookie_treats_empty_value_as_absent() {
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(header::COOKIE, header::HeaderValue::from_static("tulip_auth="));

    assert_eq!(read_cookie(&parts.headers, SESSION_COOKIE_NAME), None);
}

// --- AuthUser Extractor ---

#[tokio::test]
async fn test_auth_user_success_with_valid_cookie() {
    let app_state = create_app_state(Some(TEST_SECRET));
    let token = create_token(Role::Student, 3600);

    let mut parts = get_request_parts(Method::GET, "/api/auth/session".parse().unwrap());
    with_session_cookie(&mut parts, &token);

    let user = AuthUser::from_request_parts(&mut parts, &app_state).await.unwrap();
    assert_eq!(user.claims.role, Role::Student);
    assert_eq!(user.claims.sub, "user-42");
}

#[tokio::test]
async fn test_auth_user_failure_with_missing_cookie() {
    let app_state = create_app_state(Some(TEST_SECRET));
    let mut parts = get_request_parts(Method::GET, "/api/auth/session".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_user_ignores_legacy_role_cookie() {
    let app_state = create_app_state(Some(TEST_SECRET));
    let mut parts = get_request_parts(Method::GET, "/api/auth/session".parse().unwrap());
    parts.headers.insert(header::COOKIE, header::HeaderValue::from_static("tulip_role=admin"));

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_user_failure_when_secret_unconfigured() {
    let app_state = create_app_state(None);
    let token = create_token(Role::Admin, 3600);

    let mut parts = get_request_parts(Method::GET, "/api/auth/session".parse().unwrap());
    with_session_cookie(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}
