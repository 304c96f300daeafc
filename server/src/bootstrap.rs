//! Process setup: tracing, the dispatcher and shutdown signals.

use crate::config::Config;
use anyhow::Context;
use notebridge_core::{CredentialStore, OperationDispatcher};
use notebridge_platform::ForwardingPlatformClient;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. The tool server passes
/// `std::io::stderr` because stdout carries the protocol.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing<W>(config: &Config, writer: W) -> anyhow::Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .try_init()
        .context("installing tracing subscriber")
}

/// Build the dispatcher both facades share.
///
/// # Errors
///
/// Returns an error if the sidecar URL is invalid.
pub fn build_dispatcher(config: &Config) -> anyhow::Result<OperationDispatcher> {
    let client = ForwardingPlatformClient::new(&config.platform.url, config.platform_timeout())
        .context("configuring platform client")?;
    tracing::info!(endpoint = %client.endpoint(), "platform client configured");

    let credentials = CredentialStore::seeded(config.initial_cookies.clone());
    if credentials.status().has_cookies {
        tracing::info!("credential seeded from XHS_COOKIES");
    }

    Ok(OperationDispatcher::new(
        Arc::new(credentials),
        Arc::new(client),
        config.limits(),
    ))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
