//! A platform client that answers from a script.
//!
//! Replies are registered per primitive and cursor. Each registration is a
//! queue: successive calls with the same key consume replies in order, and
//! the last reply repeats once the queue is down to one. Every call is
//! recorded for later assertions.

use async_trait::async_trait;
use notebridge_core::filters::ProxyDescriptor;
use notebridge_core::{
    ContentPlatformClient, PlatformCall, PlatformFault, PlatformReply, SessionContext,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the client does for one call.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return this reply.
    Reply(PlatformReply),
    /// Fail as a transport fault with this detail.
    Fault(String),
}

impl Scripted {
    /// A successful page.
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self::Reply(PlatformReply::ok(data))
    }

    /// A declared primitive failure.
    #[must_use]
    pub fn failed(message: &str) -> Self {
        Self::Reply(PlatformReply::failed(message))
    }

    /// A client fault.
    #[must_use]
    pub fn fault(detail: &str) -> Self {
        Self::Fault(detail.to_string())
    }

    fn produce(&self) -> Result<PlatformReply, PlatformFault> {
        match self {
            Self::Reply(reply) => Ok(reply.clone()),
            Self::Fault(detail) => Err(PlatformFault::Transport(detail.clone())),
        }
    }
}

/// One observed call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The primitive call as issued.
    pub call: PlatformCall,
    /// The credential's raw value, if one was supplied.
    pub credential: Option<String>,
    /// Proxy hints, if any.
    pub proxy: Option<ProxyDescriptor>,
}

#[derive(Debug, Default)]
struct Script {
    replies: HashMap<(String, String), VecDeque<Scripted>>,
    fallback: Option<Scripted>,
    calls: Vec<RecordedCall>,
}

/// Scripted, recording [`ContentPlatformClient`].
///
/// # Example
///
/// ```ignore
/// let client = ScriptedPlatformClient::new()
///     .on("user_notes", "", Scripted::ok(fixtures::notes_page(&["a", "b"], "b", true)))
///     .on("user_notes", "b", Scripted::ok(fixtures::notes_page(&["c"], "", false)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlatformClient {
    script: Arc<Mutex<Script>>,
}

impl ScriptedPlatformClient {
    /// An empty script; every call faults until replies are registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue `reply` for calls to `primitive` at `cursor`.
    #[must_use]
    pub fn on(self, primitive: &str, cursor: &str, reply: Scripted) -> Self {
        self.lock()
            .replies
            .entry((primitive.to_string(), cursor.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Reply used when no registration matches.
    #[must_use]
    pub fn otherwise(self, reply: Scripted) -> Self {
        self.lock().fallback = Some(reply);
        self
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Cursors requested from `primitive`, in order.
    #[must_use]
    pub fn cursors(&self, primitive: &str) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|recorded| recorded.call.primitive() == primitive)
            .map(|recorded| cursor_of(&recorded.call))
            .collect()
    }
}

/// The cursor a call was issued at: its cursor token, homefeed score, or
/// page number as text. Empty for unpaginated primitives.
#[must_use]
pub fn cursor_of(call: &PlatformCall) -> String {
    match call {
        PlatformCall::UserNotes(query)
        | PlatformCall::UserLikes(query)
        | PlatformCall::UserCollects(query) => query.cursor.clone(),
        PlatformCall::HomefeedRecommend { cursor_score, .. } => cursor_score.clone(),
        PlatformCall::SearchNotes { page, .. } | PlatformCall::SearchUsers { page, .. } => {
            page.to_string()
        }
        PlatformCall::NoteComments { cursor, .. }
        | PlatformCall::NoteSubComments { cursor, .. }
        | PlatformCall::Mentions { cursor }
        | PlatformCall::LikesAndCollects { cursor }
        | PlatformCall::NewConnections { cursor } => cursor.clone(),
        PlatformCall::HomefeedChannels
        | PlatformCall::UserInfo { .. }
        | PlatformCall::SelfInfo
        | PlatformCall::SelfInfoV2
        | PlatformCall::NoteInfo { .. }
        | PlatformCall::NoteVideo { .. }
        | PlatformCall::NoteImage { .. }
        | PlatformCall::SearchKeyword { .. }
        | PlatformCall::UnreadMessages => String::new(),
    }
}

#[async_trait]
impl ContentPlatformClient for ScriptedPlatformClient {
    async fn call(
        &self,
        call: PlatformCall,
        session: &SessionContext,
    ) -> Result<PlatformReply, PlatformFault> {
        let key = (call.primitive().to_string(), cursor_of(&call));
        let mut script = self.lock();

        script.calls.push(RecordedCall {
            call,
            credential: session.credential.as_ref().map(|c| c.expose().to_string()),
            proxy: session.proxy.clone(),
        });

        let scripted = match script.replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match scripted.or_else(|| script.fallback.clone()) {
            Some(scripted) => scripted.produce(),
            None => Err(PlatformFault::Decode(format!(
                "no scripted reply for {} at cursor '{}'",
                key.0, key.1
            ))),
        }
    }
}
