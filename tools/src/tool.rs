//! Tool definitions and executor types.

use futures::future::BoxFuture;
use notebridge_core::{AbortSignal, ResultEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// A tool as advertised by `tools/list`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Tool name (used to identify which tool to call)
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON schema for the tool's arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Executes one tool call.
///
/// Receives the call's arguments object and a signal that fires when the
/// caller cancels the request.
pub type ToolExecutorFn =
    Arc<dyn Fn(Map<String, Value>, AbortSignal) -> BoxFuture<'static, ResultEnvelope> + Send + Sync>;

/// Result of looking up and running a tool.
pub type ToolResult = Result<ResultEnvelope, ToolError>;

/// Protocol-level tool errors.
///
/// Failures of the operation itself are not `ToolError`s; they come back as
/// an `ok = false` envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// No tool with this name is registered
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments are not a JSON object
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// What was wrong
        reason: String,
    },
}
