//! Cursor-driven page aggregation.
//!
//! Every "fetch all" and "fetch some" operation runs through
//! [`PaginationAggregator::aggregate`]. The aggregator owns the termination
//! rules; a [`PageSource`] only knows how to fetch one page for a cursor.
//!
//! # Termination
//!
//! ```text
//! fetch(cursor) ──► error ─────────────────────────► Err (nothing returned)
//!      │
//!      ├─► next == cursor (and more promised) ─────► Err(AggregationStalled)
//!      ├─► append unseen items
//!      ├─► bounded target reached ─────────────────► Ok(TargetReached)
//!      ├─► no next cursor / has_more == false ─────► Ok(Exhausted…)
//!      └─► cursor = next, check signal and ceiling, loop
//! ```
//!
//! Aggregation is all-or-nothing: any error discards the pages collected so
//! far.

use crate::error::{GatewayError, StallCause};
use crate::signal::AbortSignal;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;

/// Default hard ceiling on pages per aggregation.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// An item that may carry a resource-native identifier.
///
/// Items with an identifier are deduplicated within one aggregation; items
/// without one are always kept.
pub trait Identified {
    /// The item's identifier, if it has one.
    fn identity(&self) -> Option<&str>;
}

/// One page returned by a single-page primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in the primitive's own order.
    pub items: Vec<T>,
    /// Cursor for the following page; empty or absent means none.
    pub next_cursor: Option<String>,
    /// Explicit continuation flag, for resources that report one.
    pub has_more: Option<bool>,
}

impl<T> Page<T> {
    /// A page with a next cursor and no explicit continuation flag.
    #[must_use]
    pub const fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor,
            has_more: None,
        }
    }

    /// Set the explicit continuation flag.
    #[must_use]
    pub const fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = Some(has_more);
        self
    }

    /// Whether this page ends the crawl.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.has_more == Some(false) || self.next_cursor.as_deref().is_none_or(str::is_empty)
    }
}

/// Fetches single pages by cursor.
///
/// Implementations may keep per-crawl state (`&mut self`), e.g. a running
/// item index the remote API expects alongside the cursor.
pub trait PageSource: Send {
    /// Item type produced by this source.
    type Item: Identified + Send;

    /// Fetch the page starting at `cursor` (empty for the first page).
    ///
    /// # Errors
    ///
    /// Any error aborts the aggregation.
    fn fetch_page(
        &mut self,
        cursor: &str,
    ) -> impl Future<Output = Result<Page<Self::Item>, GatewayError>> + Send;
}

/// When an aggregation should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationPolicy {
    /// Until the resource reports no further pages.
    Exhaustive,
    /// Until this many items are collected, or the resource runs out first.
    BoundedCount(usize),
}

/// Why a successful aggregation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The resource reported no further pages.
    Exhausted,
    /// The bounded target was met; `truncated` surplus items were cut from
    /// the final page.
    TargetReached {
        /// Items dropped from the final page to hit the target exactly.
        truncated: usize,
    },
    /// The resource ran out before the bounded target was met.
    ExhaustedBeforeTarget {
        /// The target that was asked for.
        target: usize,
    },
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => f.write_str("exhausted"),
            Self::TargetReached { truncated: 0 } => f.write_str("target reached"),
            Self::TargetReached { truncated } => {
                write!(f, "target reached, {truncated} surplus items truncated")
            }
            Self::ExhaustedBeforeTarget { target } => {
                write!(f, "exhausted before target of {target}")
            }
        }
    }
}

/// Deduplicated items from every page of one aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult<T> {
    /// Items in first-seen order.
    pub items: Vec<T>,
    /// Pages fetched.
    pub pages: usize,
    /// Why the crawl stopped.
    pub reason: TerminationReason,
}

impl<T> AggregateResult<T> {
    /// Human-readable summary for envelope messages.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "fetched {} items across {} pages ({})",
            self.items.len(),
            self.pages,
            self.reason
        )
    }
}

/// Runs page sources to completion under a termination policy.
#[derive(Debug, Clone, Copy)]
pub struct PaginationAggregator {
    max_pages: usize,
}

impl Default for PaginationAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES)
    }
}

impl PaginationAggregator {
    /// Create an aggregator with a hard page ceiling (at least 1).
    #[must_use]
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages: max_pages.max(1),
        }
    }

    /// The page ceiling in force.
    #[must_use]
    pub const fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Aggregate from the first page.
    ///
    /// # Errors
    ///
    /// Propagates the first page error, [`GatewayError::AggregationStalled`]
    /// when the cursor stops advancing or the ceiling is hit, and
    /// [`GatewayError::Cancelled`] when `signal` trips between pages.
    pub async fn aggregate<S: PageSource>(
        &self,
        source: &mut S,
        policy: TerminationPolicy,
        signal: &AbortSignal,
    ) -> Result<AggregateResult<S::Item>, GatewayError> {
        self.aggregate_from(source, "", policy, signal).await
    }

    /// Aggregate starting at `start` instead of the first page.
    ///
    /// # Errors
    ///
    /// Same as [`Self::aggregate`].
    pub async fn aggregate_from<S: PageSource>(
        &self,
        source: &mut S,
        start: &str,
        policy: TerminationPolicy,
        signal: &AbortSignal,
    ) -> Result<AggregateResult<S::Item>, GatewayError> {
        let mut cursor = start.to_string();
        let mut seen: HashSet<String> = HashSet::new();
        let mut items: Vec<S::Item> = Vec::new();
        let mut pages = 0usize;

        if policy == TerminationPolicy::BoundedCount(0) {
            return Ok(AggregateResult {
                items,
                pages,
                reason: TerminationReason::TargetReached { truncated: 0 },
            });
        }

        loop {
            signal.check()?;

            if pages >= self.max_pages {
                tracing::warn!(pages, items = items.len(), "page ceiling reached");
                return Err(GatewayError::AggregationStalled {
                    cause: StallCause::IterationCeiling {
                        max_pages: self.max_pages,
                    },
                    pages,
                    items: items.len(),
                });
            }

            let page = source.fetch_page(&cursor).await?;
            pages += 1;
            metrics::counter!("notebridge_pages_fetched_total").increment(1);

            let last = page.is_last();
            let next = page.next_cursor.unwrap_or_default();

            if !last && next == cursor {
                tracing::warn!(cursor = %cursor, pages, "cursor did not advance");
                return Err(GatewayError::AggregationStalled {
                    cause: StallCause::RepeatedCursor { cursor },
                    pages,
                    items: items.len(),
                });
            }

            let received = page.items.len();
            for item in page.items {
                let unseen = item.identity().is_none_or(|id| seen.insert(id.to_owned()));
                if unseen {
                    items.push(item);
                }
            }

            tracing::debug!(
                page = pages,
                received,
                total = items.len(),
                next_cursor = %next,
                "page aggregated"
            );

            if let TerminationPolicy::BoundedCount(target) = policy {
                if items.len() >= target {
                    let truncated = items.len() - target;
                    items.truncate(target);
                    return Ok(Self::finish(
                        items,
                        pages,
                        TerminationReason::TargetReached { truncated },
                    ));
                }
            }

            if last {
                let reason = match policy {
                    TerminationPolicy::Exhaustive => TerminationReason::Exhausted,
                    TerminationPolicy::BoundedCount(target) => {
                        TerminationReason::ExhaustedBeforeTarget { target }
                    }
                };
                return Ok(Self::finish(items, pages, reason));
            }

            cursor = next;
        }
    }

    fn finish<T>(items: Vec<T>, pages: usize, reason: TerminationReason) -> AggregateResult<T> {
        tracing::info!(items = items.len(), pages, reason = %reason, "aggregation finished");
        AggregateResult {
            items,
            pages,
            reason,
        }
    }
}
