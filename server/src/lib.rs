//! # notebridge server
//!
//! Wiring shared by the two binaries:
//!
//! - `notebridge-http`: the HTTP API on `HOST:PORT`
//! - `notebridge-mcp`: the agent-tool protocol on stdin/stdout
//!
//! Both build one [`OperationDispatcher`] from [`Config`] and hand it to
//! their facade.

pub mod bootstrap;
pub mod config;

pub use bootstrap::{build_dispatcher, init_tracing, shutdown_signal};
pub use config::Config;

pub use notebridge_core::OperationDispatcher;
