use secrecy::SecretString;
use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is immutable
/// once loaded, so every thread and every request sees the same settings. It is
/// pulled into handlers via FromRef, as the "immutable AppConfig" half of the
/// Unified State Pattern (the SessionVerifier built from it is the other half).
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the `Secure` cookie flag and log format.
    pub env: Env,
    // Shared HMAC secret the login service signs `tulip_auth` tokens with.
    // `None` disables authentication entirely: every session is treated as absent.
    pub session_secret: Option<SecretString>,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Directory holding the pre-rendered frontend served behind the session gate.
    // Layout: `<route>/index.html` per page, assets under `static/` and `_next/`.
    pub static_dir: String,
}

/// Env
///
/// Defines the runtime context. Anything that is not explicitly `production`
/// is treated as local development, where the frontend is usually served over
/// plain HTTP.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Env {
    /// secure_cookies
    ///
    /// Cookies carry the `Secure` flag everywhere except local development.
    pub fn secure_cookies(self) -> bool {
        self == Env::Production
    }
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "public";

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance used for test setup.
    /// This lets tests build the state without setting environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            // Known local secret, so tests can mint matching tokens.
            session_secret: Some(SecretString::from(
                "super-secure-test-secret-value-local".to_string(),
            )),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at
    /// startup. Reads every parameter from environment variables (main.rs loads
    /// `.env` first).
    ///
    /// Never panics. A missing or blank `TULIP_AUTH_SECRET` is not a startup error:
    /// the gate fails closed and treats every request as unauthenticated. main.rs
    /// logs a warning for that case.
    pub fn load() -> Self {
        // 1. Environment Resolution
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        // 2. Session Secret Resolution
        // Whitespace-only values count as unset; an empty HMAC key would be a
        // secret every client can guess.
        let session_secret = env::var("TULIP_AUTH_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .map(SecretString::from);

        // 3. Server Settings (with defaults)
        Self {
            env,
            session_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()),
        }
    }
}
