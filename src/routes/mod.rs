mod health;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;

/// Build the application router: the gateway upgrade endpoint, health and
/// version probes, and the static client page as the fallback.
pub fn router(config: &Config, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/version", get(health::version))
        .route(&config.gateway_path, get(crate::gateway::ws_upgrade))
        .fallback_service(ServeDir::new(&config.static_path))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
