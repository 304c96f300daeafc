//! Agent-tool facade for notebridge
//!
//! Exposes every catalogue operation as a tool and serves them over a
//! line-delimited JSON-RPC 2.0 protocol, typically on stdin/stdout.
//!
//! ## Design Principles
//!
//! **One execution path**: tool executors call the same
//! `OperationDispatcher` as the HTTP facade. A tool result is the operation's
//! envelope, both as JSON text and as structured content, with `isError`
//! set whenever the envelope is a failure.
//!
//! **Protocol errors stay protocol errors**: unknown tools, malformed
//! arguments and invalid JSON-RPC produce JSON-RPC error objects; operation
//! failures never do.
//!
//! ## Modules
//!
//! - `tool`: `Tool`, executor and error types
//! - `registry`: tool registry for lookup and execution by name
//! - `catalogue`: tool definitions and executors for the operation catalogue
//! - `protocol`: JSON-RPC message types
//! - `server`: the stdio server, including cancellation of in-flight calls

pub mod catalogue;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tool;

// Re-export commonly used types
pub use catalogue::{catalogue_registry, input_schema, operation_tool};
pub use registry::ToolRegistry;
pub use server::{ServerInfo, ToolServer};
pub use tool::{Tool, ToolError, ToolExecutorFn, ToolResult};
