use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tulip_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    routes::pages::page_routes,
};

/// main
///
/// Loads configuration, initializes logging, and serves the gated frontend plus
/// the session API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tulip_portal=debug,tower_http=info".into());

    // Pretty output locally, JSON for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    if config.session_secret.is_none() {
        tracing::warn!(
            "TULIP_AUTH_SECRET is not set: every session will be rejected and protected pages redirect to login"
        );
    }

    let bind_addr = config.bind_addr.clone();
    // The frontend build, served behind the session gate.
    let pages = page_routes(&config.static_dir);
    let app = create_router(AppState::new(config), pages);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /api/swagger-ui");

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
