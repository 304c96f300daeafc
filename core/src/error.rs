//! Error taxonomy shared by every notebridge operation.
//!
//! Each variant corresponds to one failure kind a caller can act on. None of
//! them are retried inside the core: retry is the caller's decision, made at
//! the operation level.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an aggregation was declared non-terminating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StallCause {
    /// The primitive returned the cursor it was just called with.
    RepeatedCursor {
        /// The cursor that failed to advance.
        cursor: String,
    },
    /// The hard page ceiling was reached while more pages were still promised.
    IterationCeiling {
        /// The ceiling in force.
        max_pages: usize,
    },
}

impl std::fmt::Display for StallCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RepeatedCursor { cursor } => {
                write!(f, "cursor '{cursor}' did not advance")
            }
            Self::IterationCeiling { max_pages } => {
                write!(f, "page ceiling of {max_pages} reached")
            }
        }
    }
}

/// Errors produced while executing an operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No session credential has been set.
    #[error("no credential set; call set_cookies first")]
    CredentialMissing,

    /// Caller-supplied input could not be accepted.
    #[error("invalid parameter '{field}': {reason}")]
    Validation {
        /// Offending parameter name.
        field: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The platform client declared failure for one page.
    ///
    /// The message is the primitive's own diagnostic and is already
    /// user-facing.
    #[error("{message}")]
    PrimitiveFailure {
        /// Diagnostic reported by the primitive.
        message: String,
    },

    /// The aggregation did not converge.
    #[error("aggregation stalled after {pages} pages ({items} items collected): {cause}")]
    AggregationStalled {
        /// What made the crawl non-terminating.
        cause: StallCause,
        /// Pages consumed before the stall was detected.
        pages: usize,
        /// Items accumulated strictly before the stall.
        items: usize,
    },

    /// The caller went away or the aggregation deadline elapsed.
    #[error("operation cancelled: {reason}")]
    Cancelled {
        /// Why the operation stopped.
        reason: String,
    },

    /// Anything else. The detail is logged, never shown to callers.
    #[error("an internal error occurred")]
    UnexpectedFault {
        /// Internal detail, kept for logs.
        detail: String,
    },
}

impl GatewayError {
    /// Build a validation error for `field`.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build an unexpected fault carrying an internal detail.
    #[must_use]
    pub fn fault(detail: impl Into<String>) -> Self {
        Self::UnexpectedFault {
            detail: detail.into(),
        }
    }

    /// Machine-readable kind of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CredentialMissing => ErrorCode::CredentialMissing,
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::PrimitiveFailure { .. } => ErrorCode::PrimitiveFailure,
            Self::AggregationStalled { .. } => ErrorCode::AggregationStalled,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::UnexpectedFault { .. } => ErrorCode::UnexpectedFault,
        }
    }
}

/// Stable failure codes carried on failed envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// See [`GatewayError::CredentialMissing`].
    CredentialMissing,
    /// See [`GatewayError::Validation`].
    ValidationError,
    /// See [`GatewayError::PrimitiveFailure`].
    PrimitiveFailure,
    /// See [`GatewayError::AggregationStalled`].
    AggregationStalled,
    /// See [`GatewayError::Cancelled`].
    Cancelled,
    /// See [`GatewayError::UnexpectedFault`].
    UnexpectedFault,
}

impl ErrorCode {
    /// The code as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CredentialMissing => "CREDENTIAL_MISSING",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::PrimitiveFailure => "PRIMITIVE_FAILURE",
            Self::AggregationStalled => "AGGREGATION_STALLED",
            Self::Cancelled => "CANCELLED",
            Self::UnexpectedFault => "UNEXPECTED_FAULT",
        }
    }

    /// Whether the caller, not the gateway or platform, is at fault.
    #[must_use]
    pub const fn is_caller_error(self) -> bool {
        matches!(self, Self::CredentialMissing | Self::ValidationError)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
