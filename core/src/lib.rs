//! # notebridge core
//!
//! Transport-independent heart of notebridge: the pagination aggregator, the
//! credential store, the result envelope and the operation dispatcher both
//! facades delegate to.
//!
//! ## Core Concepts
//!
//! - **ContentPlatformClient**: black-box single-page fetch primitives
//! - **PaginationAggregator**: turns a page primitive into "fetch all" or
//!   "fetch N", with stall, ceiling and cancellation guards
//! - **CredentialStore**: single-slot, last-write-wins session credential
//! - **ResultEnvelope**: the `{success, message, data}` outcome every
//!   operation ends in
//! - **OperationDispatcher**: validate → resolve credential → run → envelope
//!
//! ## Example
//!
//! ```ignore
//! use notebridge_core::*;
//!
//! let dispatcher = OperationDispatcher::new(
//!     Arc::new(CredentialStore::seeded(std::env::var("XHS_COOKIES").ok())),
//!     Arc::new(my_platform_client),
//!     AggregationLimits::default(),
//! );
//!
//! let params = Params::new().with("user_url", "https://www.xiaohongshu.com/user/profile/…");
//! let envelope = dispatcher
//!     .dispatch(OperationKind::GetUserAllNotes, &params, &AbortSignal::never())
//!     .await;
//! ```

pub mod credential;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod filters;
pub mod links;
pub mod operation;
pub mod pagination;
pub mod params;
pub mod platform;
pub mod resource;
pub mod signal;

pub use credential::{Credential, CredentialStatus, CredentialStore};
pub use dispatcher::{AggregationLimits, OperationDispatcher};
pub use envelope::ResultEnvelope;
pub use error::{ErrorCode, GatewayError, StallCause};
pub use operation::{OperationKind, ParamSpec, ParamType};
pub use pagination::{
    AggregateResult, Identified, Page, PageSource, PaginationAggregator, TerminationPolicy,
    TerminationReason,
};
pub use params::Params;
pub use platform::{
    ContentPlatformClient, PlatformCall, PlatformFault, PlatformReply, SessionContext,
};
pub use signal::{AbortHandle, AbortSignal};
