//! # notebridge testing
//!
//! Testing utilities for notebridge.
//!
//! This crate provides:
//! - [`ScriptedPlatformClient`]: per-primitive, per-cursor scripted replies
//!   with call recording
//! - [`fixtures`]: page payloads in the platform's shapes
//! - [`helpers`]: dispatcher construction and tracing setup
//!
//! ## Example
//!
//! ```ignore
//! use notebridge_testing::{fixtures, helpers, Scripted, ScriptedPlatformClient};
//!
//! #[tokio::test]
//! async fn test_all_notes() {
//!     let client = ScriptedPlatformClient::new()
//!         .on("user_notes", "", Scripted::ok(fixtures::notes_page(&["a"], "", false)));
//!     let dispatcher = helpers::dispatcher(&client, Some("web_session=1"));
//!
//!     let params = Params::new().with("user_url", fixtures::profile_url("u1"));
//!     let envelope = dispatcher
//!         .dispatch(OperationKind::GetUserAllNotes, &params, &AbortSignal::never())
//!         .await;
//!     assert!(envelope.ok);
//! }
//! ```

pub mod fixtures;
pub mod scripted;

/// Test helpers and utilities.
pub mod helpers {
    use crate::ScriptedPlatformClient;
    use notebridge_core::{AggregationLimits, CredentialStore, OperationDispatcher};
    use std::sync::Arc;

    /// A dispatcher over `client` with default limits, optionally seeded with
    /// a credential.
    #[must_use]
    pub fn dispatcher(client: &ScriptedPlatformClient, cookies: Option<&str>) -> OperationDispatcher {
        dispatcher_with_limits(client, cookies, AggregationLimits::default())
    }

    /// A dispatcher over `client` with explicit aggregation limits.
    #[must_use]
    pub fn dispatcher_with_limits(
        client: &ScriptedPlatformClient,
        cookies: Option<&str>,
        limits: AggregationLimits,
    ) -> OperationDispatcher {
        OperationDispatcher::new(
            Arc::new(CredentialStore::seeded(cookies.map(str::to_string))),
            Arc::new(client.clone()),
            limits,
        )
    }

    /// Route `tracing` output to the test harness. Safe to call repeatedly.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use scripted::{RecordedCall, Scripted, ScriptedPlatformClient, cursor_of};
