use crate::AppState;
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;

/// Page Router Module
///
/// Serves the pre-rendered frontend from `static_dir`. Expected layout: one
/// directory per page route holding an `index.html` (`admin/dashboard/index.html`
/// for `/admin/dashboard`), with bundled assets under `static/` and `_next/`.
///
/// Access Control:
/// Asset namespaces get their own `ServeDir` mounts, and those namespaces are
/// exempt from the session gate. Everything else falls through to the page
/// `ServeDir`, which the gate sees under its canonical page route. So
/// `/admin/dashboard/index.html` and `/%61dmin/dashboard/` are both decided as
/// `/admin/dashboard`.
pub fn page_routes(static_dir: impl AsRef<Path>) -> Router<AppState> {
    let root = static_dir.as_ref();

    Router::new()
        // /static/*  and  /_next/*
        // Bundled assets. Never role-scoped, never gated.
        .nest_service("/static", ServeDir::new(root.join("static")))
        .nest_service("/_next", ServeDir::new(root.join("_next")))
        // Everything else: page documents, resolved to `<route>/index.html`.
        .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
}
