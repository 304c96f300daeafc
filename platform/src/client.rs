//! Sidecar forwarding client implementation

use crate::{error::SetupError, wire::CallRequest};
use async_trait::async_trait;
use notebridge_core::{
    ContentPlatformClient, PlatformCall, PlatformFault, PlatformReply, SessionContext,
};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Upper bound on how much of an error body ends up in a fault.
const MAX_ERROR_BODY: usize = 512;

/// Forwards primitive calls to a signing sidecar over HTTP.
///
/// The sidecar owns request signing and the platform's transport; this
/// client only ships `{call, cookies, proxies}` to `POST {base}/call` and
/// decodes `{success, msg|message, data}`.
#[derive(Debug, Clone)]
pub struct ForwardingPlatformClient {
    client: Client,
    endpoint: Url,
}

impl ForwardingPlatformClient {
    /// Create a client for the sidecar at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`SetupError::ClientBuild`] if the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SetupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SetupError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: call_endpoint(base_url)?,
        })
    }

    /// Where calls are posted.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn call_endpoint(base_url: &str) -> Result<Url, SetupError> {
    let invalid = |reason: String| SetupError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("call").map_err(|e| invalid(e.to_string()))
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl ContentPlatformClient for ForwardingPlatformClient {
    async fn call(
        &self,
        call: PlatformCall,
        session: &SessionContext,
    ) -> Result<PlatformReply, PlatformFault> {
        let primitive = call.primitive();
        tracing::debug!(primitive, endpoint = %self.endpoint, "forwarding platform call");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&CallRequest::new(&call, session))
            .send()
            .await
            .map_err(|e| PlatformFault::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformFault::Status {
                status: status.as_u16(),
                body: truncate(body),
            });
        }

        let reply = response
            .json::<PlatformReply>()
            .await
            .map_err(|e| PlatformFault::Decode(e.to_string()))?;
        tracing::debug!(primitive, success = reply.success, "platform call answered");
        Ok(reply)
    }
}
