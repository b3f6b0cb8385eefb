use std::net::SocketAddr;
use tokio::net::TcpListener;

use chathub::config::Config;
use chathub::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chathub=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    print_banner(&config);

    let state = AppState::new(config.command_prefix);
    let app = chathub::routes::router(&config, state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind");

    let actual_port = listener
        .local_addr()
        .expect("failed to get local address")
        .port();
    eprintln!("  \x1b[32m-> listening on 0.0.0.0:{actual_port}\x1b[0m");
    eprintln!();

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");

    eprintln!();
    eprintln!("  \x1b[1;36mchathub\x1b[0m \x1b[2mv{version}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mport\x1b[0m         {}", config.port);
    eprintln!("  \x1b[2mgateway\x1b[0m      {}", config.gateway_path);
    eprintln!("  \x1b[2mprefix\x1b[0m       {}", config.command_prefix);
    eprintln!("  \x1b[2mstatic\x1b[0m       {}", config.static_path.display());
    eprintln!();
}
