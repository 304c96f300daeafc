//! Agent-tool server on stdin/stdout.
//!
//! Logs go to stderr; stdout carries only protocol messages.

use notebridge_server::{Config, build_dispatcher, init_tracing, shutdown_signal};
use notebridge_tools::{ServerInfo, ToolServer, catalogue_registry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config, std::io::stderr)?;

    let dispatcher = build_dispatcher(&config)?;
    let registry = catalogue_registry(&dispatcher);
    tracing::info!(tools = registry.count(), "Starting notebridge tool server");

    let server = ToolServer::new(
        registry,
        ServerInfo {
            name: "notebridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    );

    tokio::select! {
        result = server.serve(tokio::io::stdin(), tokio::io::stdout()) => {
            result?;
            tracing::info!("stdin closed, exiting");
        }
        () = shutdown_signal() => {}
    }
    Ok(())
}
