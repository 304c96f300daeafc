//! # notebridge platform client
//!
//! [`ContentPlatformClient`](notebridge_core::ContentPlatformClient)
//! implementation that forwards each primitive call to a signing sidecar.
//!
//! ## Example
//!
//! ```no_run
//! use notebridge_platform::ForwardingPlatformClient;
//! use std::time::Duration;
//!
//! let client = ForwardingPlatformClient::new("http://127.0.0.1:5005", Duration::from_secs(30))?;
//! assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:5005/call");
//! # Ok::<(), notebridge_platform::SetupError>(())
//! ```
//!
//! ## Wire format
//!
//! - Request: `POST {base}/call` with `{call, cookies?, proxies?}`; `call` is
//!   the primitive tagged by its `primitive` field
//! - Response: `{success, msg | message, data}`
//! - Non-2xx statuses, connection failures and undecodable bodies become
//!   [`PlatformFault`](notebridge_core::PlatformFault)s

pub mod client;
pub mod error;
pub mod wire;

// Re-export main types for convenience
pub use client::ForwardingPlatformClient;
pub use error::SetupError;
pub use wire::CallRequest;
