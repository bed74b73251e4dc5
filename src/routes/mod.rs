/// Router Module Index
///
/// API routes split by access level. Page routes are not declared here: they are
/// supplied by the caller of `create_router` and sit behind the session gate.

/// Routes reachable without a session.
pub mod public;

/// Routes that require a verified `tulip_auth` session via the `AuthUser` extractor.
pub mod authenticated;

/// The pre-rendered frontend. Every page request here goes through the session gate.
pub mod pages;
