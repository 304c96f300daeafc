//! HTTP API server.
//!
//! ```bash
//! PLATFORM_URL=http://127.0.0.1:5005 cargo run --bin notebridge-http
//! ```

use anyhow::Context;
use notebridge_server::{Config, build_dispatcher, init_tracing, shutdown_signal};
use notebridge_web::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config, std::io::stdout)?;
    tracing::info!(?config, "Starting notebridge HTTP API");

    let dispatcher = build_dispatcher(&config)?;
    let app = router(AppState::new(dispatcher));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}
