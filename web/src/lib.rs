//! HTTP facade for notebridge.
//!
//! A thin Axum adapter over [`notebridge_core::OperationDispatcher`]:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         HTTP facade (Axum)              │  ← routing, query/path/body decoding
//! │  - correlation id, request tracing      │  ← envelope → status + JSON
//! ├─────────────────────────────────────────┤
//! │         notebridge-core                 │
//! │  - validation, credential, aggregation  │  ← shared with the tool facade
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at the operation's route
//! 2. **Merge** query string and path captures into `Params`
//! 3. **Dispatch** through the shared `OperationDispatcher`
//! 4. **Render** the envelope: `200` on success, the mapped status otherwise
//!
//! # Example
//!
//! ```ignore
//! let state = AppState::new(dispatcher);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, notebridge_web::router(state)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use error::{AppError, EnvelopeResponse, status_for};
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id};
pub use routes::{Verb, route_for, router};
pub use state::{AppState, ServiceInfo};
