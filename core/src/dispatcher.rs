//! Transport-agnostic operation execution.
//!
//! Both facades call [`OperationDispatcher::dispatch`] with an operation kind
//! and raw parameters. The dispatcher validates, resolves the credential,
//! runs a single primitive or an aggregation, and folds the outcome into a
//! [`ResultEnvelope`]. Facades never see a `GatewayError` directly.

use crate::credential::CredentialStore;
use crate::envelope::ResultEnvelope;
use crate::error::{ErrorCode, GatewayError};
use crate::links::ResourceLink;
use crate::operation::{Invocation, Operation, OperationKind, UserCollection};
use crate::pagination::{
    DEFAULT_MAX_PAGES, Identified, Page, PageSource, PaginationAggregator, TerminationPolicy,
};
use crate::params::Params;
use crate::platform::{ContentPlatformClient, PlatformCall, SessionContext, UserPageQuery, invoke};
use crate::resource::{RemoteItem, ResourceShape, cursor_text, identity_of, page_number};
use crate::signal::AbortSignal;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default wall-clock budget for one aggregation.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(600);

/// Bounds applied to every aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationLimits {
    /// Hard ceiling on pages per aggregation.
    pub max_pages: usize,
    /// Wall-clock budget per operation; `None` for unlimited.
    pub deadline: Option<Duration>,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            deadline: Some(DEFAULT_DEADLINE),
        }
    }
}

/// Executes catalogue operations against a platform client.
///
/// Cheap to clone; shared by both facades.
#[derive(Clone)]
pub struct OperationDispatcher {
    credentials: Arc<CredentialStore>,
    client: Arc<dyn ContentPlatformClient>,
    aggregator: PaginationAggregator,
    deadline: Option<Duration>,
}

impl std::fmt::Debug for OperationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDispatcher")
            .field("credentials", &self.credentials.status())
            .field("aggregator", &self.aggregator)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl OperationDispatcher {
    /// Create a dispatcher.
    #[must_use]
    pub fn new(
        credentials: Arc<CredentialStore>,
        client: Arc<dyn ContentPlatformClient>,
        limits: AggregationLimits,
    ) -> Self {
        Self {
            credentials,
            client,
            aggregator: PaginationAggregator::new(limits.max_pages),
            deadline: limits.deadline,
        }
    }

    /// The shared credential store.
    #[must_use]
    pub const fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Run `kind` with `params` and return its envelope.
    ///
    /// `signal` is checked between pages of any aggregation; the configured
    /// deadline is layered on top of it.
    pub async fn dispatch(
        &self,
        kind: OperationKind,
        params: &Params,
        signal: &AbortSignal,
    ) -> ResultEnvelope {
        let started = Instant::now();
        let result = match kind.parse(params) {
            Ok(invocation) => self.execute(invocation, signal).await,
            Err(error) => Err(error),
        };
        let envelope = ResultEnvelope::from_result(result);

        let outcome = envelope.code.map_or("OK", ErrorCode::as_str);
        metrics::counter!(
            "notebridge_operations_total",
            "operation" => kind.name(),
            "outcome" => outcome
        )
        .increment(1);
        tracing::info!(
            operation = %kind,
            outcome,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "operation finished"
        );

        envelope
    }

    /// Run an already-validated invocation.
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`] other than validation, which happened at parse
    /// time.
    pub async fn execute(
        &self,
        invocation: Invocation,
        signal: &AbortSignal,
    ) -> Result<(String, Value), GatewayError> {
        let Invocation {
            operation, proxy, ..
        } = invocation;

        let credential = if operation.requires_credential() {
            Some(self.credentials.get()?)
        } else {
            None
        };
        let session = SessionContext { credential, proxy };
        let signal = match self.deadline {
            Some(deadline) => signal.clone().with_timeout(deadline),
            None => signal.clone(),
        };

        match operation {
            Operation::Page(call) => {
                let reply = invoke(self.client.as_ref(), call, &session).await?;
                Ok((reply.message, reply.data))
            }
            Operation::HomefeedSome { category, num } => {
                let mut source = HomefeedSource {
                    client: self.client.as_ref(),
                    session: &session,
                    category,
                    pages: 0,
                    received: 0,
                };
                self.collect(&mut source, bounded(num), &signal).await
            }
            Operation::UserAll { collection, link } => {
                self.user_all(collection, &link, &session, &signal).await
            }
            Operation::SearchSomeNotes {
                query,
                num,
                filters,
            } => {
                let mut source =
                    self.pages(&session, ResourceShape::SEARCH_NOTES, |cursor: &str| {
                        PlatformCall::SearchNotes {
                            query: query.clone(),
                            page: page_number(cursor),
                            filters: filters.clone(),
                        }
                    });
                self.collect(&mut source, bounded(num), &signal).await
            }
            Operation::SearchSomeUsers { query, num } => {
                let mut source =
                    self.pages(&session, ResourceShape::SEARCH_USERS, |cursor: &str| {
                        PlatformCall::SearchUsers {
                            query: query.clone(),
                            page: page_number(cursor),
                        }
                    });
                self.collect(&mut source, bounded(num), &signal).await
            }
            Operation::AllComments {
                note_id,
                xsec_token,
            } => {
                let mut source = self.pages(&session, ResourceShape::COMMENTS, |cursor: &str| {
                    PlatformCall::NoteComments {
                        note_id: note_id.clone(),
                        cursor: cursor.to_string(),
                        xsec_token: xsec_token.clone(),
                    }
                });
                self.collect(&mut source, TerminationPolicy::Exhaustive, &signal)
                    .await
            }
            Operation::AllCommentsNested { link } => {
                self.all_comments_nested(&link, &session, &signal).await
            }
            Operation::AllMessages(feed) => {
                let mut source = self.pages(&session, ResourceShape::MESSAGES, |cursor: &str| {
                    feed.call(cursor.to_string())
                });
                self.collect(&mut source, TerminationPolicy::Exhaustive, &signal)
                    .await
            }
            Operation::SetCredential(cookies) => {
                self.credentials.set(cookies);
                Ok(("cookies set".to_string(), self.credential_status()?))
            }
            Operation::CredentialStatus => {
                Ok(("cookie status".to_string(), self.credential_status()?))
            }
        }
    }

    fn credential_status(&self) -> Result<Value, GatewayError> {
        serde_json::to_value(self.credentials.status())
            .map_err(|e| GatewayError::fault(format!("encoding credential status: {e}")))
    }

    fn pages<'a, F>(
        &'a self,
        session: &'a SessionContext,
        shape: ResourceShape,
        call_for: F,
    ) -> PrimitiveSource<'a, F>
    where
        F: FnMut(&str) -> PlatformCall + Send,
    {
        PrimitiveSource {
            client: self.client.as_ref(),
            session,
            shape,
            call_for,
        }
    }

    async fn collect<S>(
        &self,
        source: &mut S,
        policy: TerminationPolicy,
        signal: &AbortSignal,
    ) -> Result<(String, Value), GatewayError>
    where
        S: PageSource<Item = RemoteItem>,
    {
        let result = self.aggregator.aggregate(source, policy, signal).await?;
        let message = result.summary();
        let items = result.items.into_iter().map(RemoteItem::into_body).collect();
        Ok((message, Value::Array(items)))
    }

    async fn user_all(
        &self,
        collection: UserCollection,
        link: &ResourceLink,
        session: &SessionContext,
        signal: &AbortSignal,
    ) -> Result<(String, Value), GatewayError> {
        let mut source = self.pages(session, ResourceShape::USER_NOTES, |cursor: &str| {
            collection.call(UserPageQuery {
                user_id: link.id.clone(),
                cursor: cursor.to_string(),
                xsec_token: link.xsec_token.clone(),
                xsec_source: link.xsec_source.clone(),
            })
        });
        self.collect(&mut source, TerminationPolicy::Exhaustive, signal)
            .await
    }

    /// Every first-level comment, each with its complete reply list.
    async fn all_comments_nested(
        &self,
        link: &ResourceLink,
        session: &SessionContext,
        signal: &AbortSignal,
    ) -> Result<(String, Value), GatewayError> {
        let mut top = {
            let mut source = self.pages(session, ResourceShape::COMMENTS, |cursor: &str| {
                PlatformCall::NoteComments {
                    note_id: link.id.clone(),
                    cursor: cursor.to_string(),
                    xsec_token: link.xsec_token.clone(),
                }
            });
            self.aggregator
                .aggregate(&mut source, TerminationPolicy::Exhaustive, signal)
                .await?
        };

        let mut pages = top.pages;
        let mut replies = 0usize;
        for comment in &mut top.items {
            let has_more = comment
                .body()
                .get("sub_comment_has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let Some(root_comment_id) = comment.identity().map(str::to_owned) else {
                continue;
            };
            if !has_more {
                continue;
            }
            let start = comment
                .body()
                .get("sub_comment_cursor")
                .and_then(cursor_text)
                .unwrap_or_default();

            let mut source = self.pages(session, ResourceShape::COMMENTS, |cursor: &str| {
                PlatformCall::NoteSubComments {
                    note_id: link.id.clone(),
                    root_comment_id: root_comment_id.clone(),
                    cursor: cursor.to_string(),
                    xsec_token: link.xsec_token.clone(),
                }
            });
            let inner = self
                .aggregator
                .aggregate_from(&mut source, &start, TerminationPolicy::Exhaustive, signal)
                .await?;

            pages += inner.pages;
            replies += merge_replies(comment.body_mut(), inner.items);
        }

        let message = format!(
            "fetched {} comments and {replies} additional replies across {pages} pages",
            top.items.len()
        );
        let items = top.items.into_iter().map(RemoteItem::into_body).collect();
        Ok((message, Value::Array(items)))
    }
}

fn bounded(num: u32) -> TerminationPolicy {
    TerminationPolicy::BoundedCount(usize::try_from(num).unwrap_or(usize::MAX))
}

/// Append unseen `replies` to the comment's `sub_comments`; returns how many
/// were added.
fn merge_replies(comment: &mut Value, replies: Vec<RemoteItem>) -> usize {
    let Some(object) = comment.as_object_mut() else {
        return 0;
    };

    let mut added = 0;
    {
        let slot = object
            .entry("sub_comments")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(existing) = slot {
            let mut seen: HashSet<String> = existing
                .iter()
                .filter_map(|reply| identity_of(reply, ResourceShape::COMMENTS.id_key))
                .collect();
            for reply in replies {
                let unseen = reply.identity().is_none_or(|id| seen.insert(id.to_owned()));
                if unseen {
                    existing.push(reply.into_body());
                    added += 1;
                }
            }
        }
    }
    object.insert("sub_comment_has_more".to_string(), Value::Bool(false));
    added
}

/// Pages of one resource, fetched by a call built from the cursor.
struct PrimitiveSource<'a, F> {
    client: &'a dyn ContentPlatformClient,
    session: &'a SessionContext,
    shape: ResourceShape,
    call_for: F,
}

impl<F> PageSource for PrimitiveSource<'_, F>
where
    F: FnMut(&str) -> PlatformCall + Send,
{
    type Item = RemoteItem;

    async fn fetch_page(&mut self, cursor: &str) -> Result<Page<RemoteItem>, GatewayError> {
        let call = (self.call_for)(cursor);
        let reply = invoke(self.client, call, self.session).await?;
        self.shape.page_from(reply.data, cursor)
    }
}

/// Homefeed pages. The feed wants a refresh type (1 for the first page, 3
/// after) and the number of items already received alongside the cursor.
struct HomefeedSource<'a> {
    client: &'a dyn ContentPlatformClient,
    session: &'a SessionContext,
    category: String,
    pages: u32,
    received: u32,
}

impl PageSource for HomefeedSource<'_> {
    type Item = RemoteItem;

    async fn fetch_page(&mut self, cursor: &str) -> Result<Page<RemoteItem>, GatewayError> {
        let call = PlatformCall::HomefeedRecommend {
            category: self.category.clone(),
            cursor_score: cursor.to_string(),
            refresh_type: if self.pages == 0 { 1 } else { 3 },
            note_index: self.received,
        };
        let reply = invoke(self.client, call, self.session).await?;
        let page = ResourceShape::HOMEFEED.page_from(reply.data, cursor)?;

        self.pages += 1;
        self.received = self
            .received
            .saturating_add(u32::try_from(page.items.len()).unwrap_or(u32::MAX));
        Ok(page)
    }
}
