//! Request body sent to the sidecar.

use notebridge_core::filters::ProxyDescriptor;
use notebridge_core::{PlatformCall, SessionContext};
use serde::Serialize;

/// `POST {base}/call` body.
///
/// ```json
/// {"call": {"primitive": "user_notes", "user_id": "…", …},
///  "cookies": "a1=…; web_session=…",
///  "proxies": {"https": "http://…"}}
/// ```
#[derive(Debug, Serialize)]
pub struct CallRequest<'a> {
    /// The primitive and its arguments, tagged by `primitive`.
    pub call: &'a PlatformCall,
    /// Raw cookie header; absent for primitives that need no session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<&'a str>,
    /// Proxy hints, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxies: Option<&'a ProxyDescriptor>,
}

impl<'a> CallRequest<'a> {
    /// Borrow the call and session into a request body.
    #[must_use]
    pub fn new(call: &'a PlatformCall, session: &'a SessionContext) -> Self {
        Self {
            call,
            cookies: session.credential.as_ref().map(|c| c.expose()),
            proxies: session.proxy.as_ref(),
        }
    }
}
