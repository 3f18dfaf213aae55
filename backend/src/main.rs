use dotenvy::dotenv;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnResponse};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use std::net::SocketAddr;
use std::sync::Arc;

mod config {
    pub mod dev_config;
}
mod handlers {
    pub mod dev_errors;
    pub mod site_handlers;
    pub mod screenshot_handlers;
}
mod utils {
    pub mod site_paths;
    pub mod ssi;
}

use config::dev_config::DevConfig;
use handlers::site_handlers;
use handlers::screenshot_handlers;

pub struct AppState {
    config: DevConfig,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dev/screenshot", post(screenshot_handlers::save_screenshot))
        .route("/", get(site_handlers::index))
        .route("/{*path}", get(site_handlers::serve_file))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        // Local development only, any origin may post screenshots.
        .layer(
            CorsLayer::new()
                .allow_methods(Any)
                .allow_origin(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

fn print_banner(config: &DevConfig) {
    tracing::info!("Jammix Dev Server");
    tracing::info!("Serving site from: {}", config.site_root.display());
    tracing::info!("Screenshots dir:   {}", config.screenshots_dir.display());
    tracing::info!("Visit: http://localhost:{}", config.port);
    tracing::info!(
        "Screenshot API: POST http://localhost:{}/dev/screenshot with {{\"image\": \"data:image/png;base64,...\", \"name\": \"optional-name\"}}",
        config.port
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DevConfig::from_env()?;
    print_banner(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(AppState { config });

    use tokio::net::TcpListener;

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app(state).into_make_service()).await?;
    Ok(())
}
