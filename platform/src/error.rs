//! Error types for building the forwarding client

use thiserror::Error;

/// Errors that can occur while setting up a [`crate::ForwardingPlatformClient`].
#[derive(Debug, Error)]
pub enum SetupError {
    /// The sidecar base URL does not parse or cannot carry a path
    #[error("Invalid platform URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),
}
