//! Tool registry for dynamic tool management
//!
//! The registry provides:
//! - Tool registration by name
//! - Thread-safe tool storage
//! - Tool execution by name
//! - Tool listing for `tools/list`

use crate::tool::{Tool, ToolError, ToolExecutorFn, ToolResult};
use notebridge_core::AbortSignal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Entries = HashMap<String, (Tool, ToolExecutorFn)>;

/// Thread-safe tool registry
///
/// ## Example
///
/// ```ignore
/// let registry = ToolRegistry::new();
/// let (tool, executor) = operation_tool(&dispatcher, OperationKind::GetUserNotes);
/// registry.register(tool, executor);
///
/// let result = registry
///     .execute("get_user_notes", json!({"user_id": "…"}), AbortSignal::never())
///     .await;
/// ```
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<Entries>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_tools())
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty tool registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking executor never holds the lock, so a poisoned map is intact.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a tool with its executor
    ///
    /// Returns `true` if a tool with the same name was replaced.
    pub fn register(&self, tool: Tool, executor: ToolExecutorFn) -> bool {
        self.write()
            .insert(tool.name.clone(), (tool, executor))
            .is_some()
    }

    /// Execute a tool by name
    ///
    /// `arguments` must be a JSON object; `null` is treated as `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] for an unknown tool and
    /// [`ToolError::InvalidArguments`] for non-object arguments.
    pub async fn execute(&self, name: &str, arguments: Value, signal: AbortSignal) -> ToolResult {
        // Release the lock before running the tool
        let executor = self.read().get(name).map(|(_, executor)| executor.clone());
        let Some(executor) = executor else {
            return Err(ToolError::NotFound(name.to_string()));
        };

        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ToolError::InvalidArguments {
                    tool: name.to_string(),
                    reason: format!("expected an object, got {other}"),
                });
            }
        };

        Ok(executor(arguments, signal).await)
    }

    /// All registered tool names, sorted
    #[must_use]
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered tools, sorted by name
    #[must_use]
    pub fn get_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.read().values().map(|(tool, _)| tool.clone()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// A specific tool by name
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<Tool> {
        self.read().get(name).map(|(tool, _)| tool.clone())
    }

    /// Number of registered tools
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }
}
