//! The seam to the content platform.
//!
//! Network calls, signing and session handling live behind
//! [`ContentPlatformClient`]. The gateway only ever issues one
//! [`PlatformCall`] at a time and classifies the outcome:
//!
//! - `Ok(reply)` with `reply.success == true`: the page.
//! - `Ok(reply)` with `reply.success == false`: a declared primitive failure.
//! - `Err(fault)`: the client could not complete the call at all.

use crate::credential::Credential;
use crate::error::GatewayError;
use crate::filters::{ProxyDescriptor, SearchFilters};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Cursor-addressed page of a user's notes, likes or collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPageQuery {
    /// Profile owner.
    pub user_id: String,
    /// Page cursor, empty for the first page.
    pub cursor: String,
    /// Access token from the profile URL.
    pub xsec_token: String,
    /// Access source from the profile URL.
    pub xsec_source: String,
}

/// One single-page primitive offered by the platform client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitive", rename_all = "snake_case")]
pub enum PlatformCall {
    /// All homefeed channels.
    HomefeedChannels,
    /// One page of homefeed recommendations.
    HomefeedRecommend {
        /// Channel id, empty for the default feed.
        category: String,
        /// Cursor from the previous page.
        cursor_score: String,
        /// 1 for a fresh feed, 3 for continuation.
        refresh_type: u32,
        /// Items already received in this crawl.
        note_index: u32,
    },
    /// Another user's profile.
    UserInfo {
        /// Profile owner.
        user_id: String,
    },
    /// The session owner's profile.
    SelfInfo,
    /// The session owner's profile, alternate endpoint.
    SelfInfoV2,
    /// Notes posted by a user.
    UserNotes(UserPageQuery),
    /// Notes a user liked.
    UserLikes(UserPageQuery),
    /// Notes a user collected.
    UserCollects(UserPageQuery),
    /// Detail of one note.
    NoteInfo {
        /// Note id.
        note_id: String,
        /// Access token.
        xsec_token: String,
        /// Access source.
        xsec_source: String,
    },
    /// Watermark-free video URL of a note.
    NoteVideo {
        /// Note id.
        note_id: String,
    },
    /// Watermark-free version of an image URL.
    NoteImage {
        /// Image URL as found in a note.
        img_url: String,
    },
    /// Search suggestions for a keyword.
    SearchKeyword {
        /// Partial keyword.
        word: String,
    },
    /// One page of note search results.
    SearchNotes {
        /// Search query.
        query: String,
        /// 1-based page number.
        page: u32,
        /// Result filters.
        #[serde(flatten)]
        filters: SearchFilters,
    },
    /// One page of user search results.
    SearchUsers {
        /// Search query.
        query: String,
        /// 1-based page number.
        page: u32,
    },
    /// One page of first-level comments.
    NoteComments {
        /// Note id.
        note_id: String,
        /// Page cursor.
        cursor: String,
        /// Access token.
        xsec_token: String,
    },
    /// One page of replies under a first-level comment.
    NoteSubComments {
        /// Note id.
        note_id: String,
        /// First-level comment the replies belong to.
        root_comment_id: String,
        /// Page cursor.
        cursor: String,
        /// Access token.
        xsec_token: String,
    },
    /// Unread message counters.
    UnreadMessages,
    /// One page of comment and @ mentions.
    Mentions {
        /// Page cursor.
        cursor: String,
    },
    /// One page of like and collect notifications.
    LikesAndCollects {
        /// Page cursor.
        cursor: String,
    },
    /// One page of new-follower notifications.
    NewConnections {
        /// Page cursor.
        cursor: String,
    },
}

impl PlatformCall {
    /// Whether the primitive needs a session credential.
    #[must_use]
    pub const fn requires_credential(&self) -> bool {
        !matches!(self, Self::NoteVideo { .. } | Self::NoteImage { .. })
    }

    /// Short name of the primitive, as serialized in the `primitive` tag.
    #[must_use]
    pub const fn primitive(&self) -> &'static str {
        match self {
            Self::HomefeedChannels => "homefeed_channels",
            Self::HomefeedRecommend { .. } => "homefeed_recommend",
            Self::UserInfo { .. } => "user_info",
            Self::SelfInfo => "self_info",
            Self::SelfInfoV2 => "self_info_v2",
            Self::UserNotes(_) => "user_notes",
            Self::UserLikes(_) => "user_likes",
            Self::UserCollects(_) => "user_collects",
            Self::NoteInfo { .. } => "note_info",
            Self::NoteVideo { .. } => "note_video",
            Self::NoteImage { .. } => "note_image",
            Self::SearchKeyword { .. } => "search_keyword",
            Self::SearchNotes { .. } => "search_notes",
            Self::SearchUsers { .. } => "search_users",
            Self::NoteComments { .. } => "note_comments",
            Self::NoteSubComments { .. } => "note_sub_comments",
            Self::UnreadMessages => "unread_messages",
            Self::Mentions { .. } => "mentions",
            Self::LikesAndCollects { .. } => "likes_and_collects",
            Self::NewConnections { .. } => "new_connections",
        }
    }
}

/// What the platform client says about one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformReply {
    /// Whether the primitive succeeded.
    pub success: bool,
    /// The primitive's own diagnostic.
    #[serde(default, alias = "msg")]
    pub message: String,
    /// Page payload.
    #[serde(default)]
    pub data: Value,
}

impl PlatformReply {
    /// A successful reply.
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            message: "success".to_string(),
            data,
        }
    }

    /// A declared failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Value::Null,
        }
    }
}

/// The platform client could not complete a call.
#[derive(Debug, Error)]
pub enum PlatformFault {
    /// Network or connection failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The upstream answered with a non-success HTTP status.
    #[error("upstream returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The upstream answer could not be decoded.
    #[error("malformed reply: {0}")]
    Decode(String),
}

/// Per-call session data handed to the platform client.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Credential, absent only for primitives that do not need one.
    pub credential: Option<Credential>,
    /// Caller-supplied proxy hints.
    pub proxy: Option<ProxyDescriptor>,
}

/// Black-box single-page fetch primitives.
#[async_trait]
pub trait ContentPlatformClient: Send + Sync {
    /// Perform one primitive call.
    ///
    /// # Errors
    ///
    /// Returns a [`PlatformFault`] when the call could not be completed. A
    /// primitive that ran and failed is an `Ok` reply with `success == false`.
    async fn call(
        &self,
        call: PlatformCall,
        session: &SessionContext,
    ) -> Result<PlatformReply, PlatformFault>;
}

/// Run `call` and classify the outcome.
///
/// # Errors
///
/// [`GatewayError::PrimitiveFailure`] for declared failures,
/// [`GatewayError::UnexpectedFault`] for client faults.
pub async fn invoke(
    client: &dyn ContentPlatformClient,
    call: PlatformCall,
    session: &SessionContext,
) -> Result<PlatformReply, GatewayError> {
    let primitive = call.primitive();
    match client.call(call, session).await {
        Ok(mut reply) if reply.success => {
            if reply.message.is_empty() {
                reply.message = format!("{primitive} succeeded");
            }
            Ok(reply)
        }
        Ok(reply) => {
            tracing::debug!(primitive, message = %reply.message, "primitive declared failure");
            let message = if reply.message.is_empty() {
                format!("{primitive} failed")
            } else {
                reply.message
            };
            Err(GatewayError::PrimitiveFailure { message })
        }
        Err(fault) => Err(GatewayError::fault(format!("{primitive}: {fault}"))),
    }
}
