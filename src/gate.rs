//! Session gate
//!
//! Every page request passes through [`session_gate`]: the path is canonicalized the
//! way the file server will resolve it, classified, the `tulip_auth` cookie is
//! verified, and the pair is folded into one of five fixed routing decisions.
//! Classification and the decision table are pure functions so they can be
//! exercised without a router.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use percent_encoding::percent_decode_str;

use crate::{
    AppState,
    cookies::{SESSION_COOKIE_NAME, read_cookie},
    models::Role,
};

pub const HOME_PATH: &str = "/";
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";
pub const STUDENT_LOGIN_PATH: &str = "/mahasiswa/login";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const STUDENT_DASHBOARD_PATH: &str = "/mahasiswa/dashboard";

const ADMIN_PREFIX: &str = "/admin";
const STUDENT_PREFIX: &str = "/mahasiswa";

const PUBLIC_PATHS: [&str; 3] = [HOME_PATH, ADMIN_LOGIN_PATH, STUDENT_LOGIN_PATH];

/// Namespaces that never enter the gate: the JSON API and framework/static assets.
pub const EXCLUDED_NAMESPACES: [&str; 3] = ["/api", "/_next", "/static"];

/// Rendered page documents. A file name with one of these extensions is a page,
/// not an asset, and always goes through the gate.
const PAGE_EXTENSIONS: [&str; 2] = ["html", "htm"];

const DIRECTORY_INDEX: &str = "index.html";

// --- Path Canonicalization ---

/// normalize_path
///
/// Rewrites a raw request path into the form the static file server resolves it to:
/// percent-decoded, empty and `.` segments dropped, `..` applied, and a trailing
/// `index.html` folded into its directory. `/%61dmin//./dashboard/index.html`
/// becomes `/admin/dashboard`.
///
/// Every gate decision is made on this form, so no spelling of a path can be
/// classified differently from the file it ends up serving.
pub fn normalize_path(raw: &str) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    if segments.last() == Some(&DIRECTORY_INDEX) {
        segments.pop();
    }

    format!("/{}", segments.join("/"))
}

// --- Route Classifier ---

/// RouteClass
///
/// The category a request path falls into before the access decision is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    AdminScoped,
    StudentScoped,
    Unscoped,
}

/// Total, case-sensitive classification. Public paths win over the prefix rules,
/// which is what keeps the two login pages reachable without a session.
pub fn classify(path: &str) -> RouteClass {
    if PUBLIC_PATHS.contains(&path) {
        RouteClass::Public
    } else if path.starts_with(ADMIN_PREFIX) {
        RouteClass::AdminScoped
    } else if path.starts_with(STUDENT_PREFIX) {
        RouteClass::StudentScoped
    } else {
        RouteClass::Unscoped
    }
}

pub fn is_login_page(path: &str) -> bool {
    path == ADMIN_LOGIN_PATH || path == STUDENT_LOGIN_PATH
}

/// Paths the gate lets through unexamined: API and asset namespaces, plus asset
/// files (`logo.png`, `favicon.ico`) outside the role-scoped prefixes.
///
/// Page documents (`.html`) and any file under `/admin` or `/mahasiswa` are never
/// exempt: those are the pages themselves, or data rendered for them.
pub fn is_excluded(path: &str) -> bool {
    let in_namespace = EXCLUDED_NAMESPACES.iter().any(|namespace| {
        path.strip_prefix(namespace)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });

    in_namespace || is_asset_file(path)
}

fn is_asset_file(path: &str) -> bool {
    if matches!(classify(path), RouteClass::AdminScoped | RouteClass::StudentScoped) {
        return false;
    }

    file_extension(path).is_some_and(|ext| {
        !PAGE_EXTENSIONS
            .iter()
            .any(|page| ext.eq_ignore_ascii_case(page))
    })
}

fn file_extension(path: &str) -> Option<&str> {
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext)
}

// --- Access Decision Engine ---

/// Decision
///
/// The only outcomes the gate can produce. There is no "unknown" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectAdminLogin,
    RedirectStudentLogin,
    RedirectAdminDashboard,
    RedirectStudentDashboard,
}

impl Decision {
    /// The redirect target, or `None` when the request proceeds.
    pub fn location(self) -> Option<&'static str> {
        match self {
            Decision::Allow => None,
            Decision::RedirectAdminLogin => Some(ADMIN_LOGIN_PATH),
            Decision::RedirectStudentLogin => Some(STUDENT_LOGIN_PATH),
            Decision::RedirectAdminDashboard => Some(ADMIN_DASHBOARD_PATH),
            Decision::RedirectStudentDashboard => Some(STUDENT_DASHBOARD_PATH),
        }
    }

    fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Admin => Decision::RedirectAdminDashboard,
            Role::Student => Decision::RedirectStudentDashboard,
        }
    }
}

/// The decision table. `session` is the role from a verified token, `None` when
/// the request is unauthenticated.
///
/// Unscoped paths send anonymous visitors to the student login and let any
/// authenticated role through.
pub fn decide(class: RouteClass, on_login_page: bool, session: Option<Role>) -> Decision {
    match (class, session) {
        (RouteClass::Public, Some(role)) if on_login_page => Decision::dashboard_for(role),
        (RouteClass::Public, _) => Decision::Allow,

        (RouteClass::AdminScoped, None) => Decision::RedirectAdminLogin,
        (RouteClass::StudentScoped, None) => Decision::RedirectStudentLogin,
        (RouteClass::Unscoped, None) => Decision::RedirectStudentLogin,

        (RouteClass::AdminScoped, Some(Role::Student)) => Decision::RedirectStudentDashboard,
        (RouteClass::StudentScoped, Some(Role::Admin)) => Decision::RedirectAdminDashboard,
        (RouteClass::AdminScoped, Some(Role::Admin))
        | (RouteClass::StudentScoped, Some(Role::Student))
        | (RouteClass::Unscoped, Some(_)) => Decision::Allow,
    }
}

/// Classify `path` and run it through the decision table.
pub fn evaluate(path: &str, session: Option<Role>) -> Decision {
    decide(classify(path), is_login_page(path), session)
}

// --- Middleware ---

/// session_gate
///
/// Wraps the whole router. Excluded paths pass straight through; everything else
/// is either forwarded or answered with a 307 redirect. Decisions are made on the
/// canonical path, never on the raw request spelling.
pub async fn session_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let canonical = normalize_path(request.uri().path());
    let path = canonical.as_str();
    if is_excluded(path) {
        return next.run(request).await;
    }

    let claims = state
        .verifier
        .verify(read_cookie(request.headers(), SESSION_COOKIE_NAME));
    let role = claims.as_ref().map(|claims| claims.role);
    let decision = evaluate(path, role);

    tracing::debug!(
        path,
        raw_path = request.uri().path(),
        class = ?classify(path),
        role = role.map(Role::as_str).unwrap_or("none"),
        ?decision,
        "session gate decision"
    );

    match decision.location() {
        None => next.run(request).await,
        Some(location) => Redirect::temporary(location).into_response(),
    }
}
