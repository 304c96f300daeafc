//! Configuration management for the notebridge binaries.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Both binaries read the same variables; the tool server ignores `HOST`
//! and `PORT`.

use notebridge_core::AggregationLimits;
use serde::Serialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Clone, Serialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Signing sidecar configuration
    pub platform: PlatformConfig,
    /// Aggregation bounds
    pub aggregation: AggregationConfig,
    /// Credential to start with (`XHS_COOKIES`); never serialized or printed
    #[serde(skip)]
    pub initial_cookies: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

/// Signing sidecar configuration
#[derive(Debug, Clone, Serialize)]
pub struct PlatformConfig {
    /// Sidecar base URL; calls go to `{url}/call`
    pub url: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

/// Aggregation bounds
#[derive(Debug, Clone, Serialize)]
pub struct AggregationConfig {
    /// Hard ceiling on pages per aggregation
    pub max_pages: usize,
    /// Wall-clock budget per operation in seconds (0 = unlimited)
    pub deadline_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("platform", &self.platform)
            .field("aggregation", &self.aggregation)
            .field(
                "initial_cookies",
                &self.initial_cookies.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed(&lookup, "PORT").unwrap_or(8000),
                log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            },
            platform: PlatformConfig {
                url: lookup("PLATFORM_URL")
                    .unwrap_or_else(|| "http://127.0.0.1:5005".to_string()),
                timeout_secs: parsed(&lookup, "PLATFORM_TIMEOUT_SECS").unwrap_or(30),
            },
            aggregation: AggregationConfig {
                max_pages: parsed(&lookup, "AGGREGATION_MAX_PAGES").unwrap_or(1000),
                deadline_secs: parsed(&lookup, "AGGREGATION_DEADLINE_SECS").unwrap_or(600),
            },
            initial_cookies: lookup("XHS_COOKIES").filter(|c| !c.trim().is_empty()),
        }
    }

    /// Address the HTTP server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Per-call timeout for the sidecar.
    #[must_use]
    pub const fn platform_timeout(&self) -> Duration {
        Duration::from_secs(self.platform.timeout_secs)
    }

    /// Aggregation limits for the dispatcher.
    #[must_use]
    pub fn limits(&self) -> AggregationLimits {
        AggregationLimits {
            max_pages: self.aggregation.max_pages.max(1),
            deadline: (self.aggregation.deadline_secs > 0)
                .then(|| Duration::from_secs(self.aggregation.deadline_secs)),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}
