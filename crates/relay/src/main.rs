//! Scoreboard overlay relay — viewer-count broadcast backend.
//!
//! Optional env: HOST, PORT

use std::sync::Arc;

use relay::{api, config, relay::RelayState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env();

    let state = api::AppState {
        relay: Arc::new(RelayState::new()),
    };

    let app = api::router(state);

    let addr: std::net::SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid bind address");

    tracing::info!("Relay listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on ctrl-c so open sockets get a clean close on the way down.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
