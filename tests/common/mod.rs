#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use chathub::config::Config;
use chathub::routes;
use chathub::state::AppState;
use tokio::net::TcpListener;

pub fn test_config() -> Config {
    Config {
        port: 0,
        gateway_path: "/websocket".to_string(),
        command_prefix: '/',
        static_path: std::path::PathBuf::from("./public"),
    }
}

pub fn test_app() -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(config.command_prefix);
    (routes::router(&config, state.clone()), state)
}

/// Spawn a full server on an ephemeral port. Each caller gets an isolated
/// hub, so tests can rely on session ids starting from zero.
pub async fn spawn_server() -> String {
    let (app, _state) = test_app();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    format!("ws://127.0.0.1:{}", addr.port())
}
