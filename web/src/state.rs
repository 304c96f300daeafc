//! Application state for Axum handlers.

use notebridge_core::OperationDispatcher;
use serde::Serialize;

/// Name and version reported by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: String,
    /// Service version.
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "notebridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Application state shared across all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Executes operations; shared with the tool facade in-process.
    pub dispatcher: OperationDispatcher,
    /// Reported by the root endpoint.
    pub service: ServiceInfo,
}

impl AppState {
    /// Create state around a dispatcher.
    #[must_use]
    pub fn new(dispatcher: OperationDispatcher) -> Self {
        Self {
            dispatcher,
            service: ServiceInfo::default(),
        }
    }
}
