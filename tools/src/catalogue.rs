//! Catalogue operations as tools.
//!
//! Every [`OperationKind`] becomes one tool of the same name whose input
//! schema is generated from the operation's parameter specs. Executors hand
//! the arguments to the shared [`OperationDispatcher`], so a tool call and
//! the matching HTTP request produce the same envelope.

use crate::registry::ToolRegistry;
use crate::tool::{Tool, ToolExecutorFn};
use notebridge_core::{OperationDispatcher, OperationKind, ParamType, Params};
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// JSON schema for an operation's arguments.
#[must_use]
pub fn input_schema(kind: OperationKind) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for spec in kind.parameters() {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(spec.ty.schema_type()));
        property.insert("description".to_string(), json!(spec.description));
        if let Some(default) = spec.default {
            property.insert("default".to_string(), json!(default));
        }
        if spec.ty == ParamType::Object {
            property.insert("additionalProperties".to_string(), json!(true));
        }
        properties.insert(spec.name.to_string(), Value::Object(property));

        if spec.required {
            required.push(json!(spec.name));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// The tool definition and executor for one operation.
#[must_use]
pub fn operation_tool(dispatcher: &OperationDispatcher, kind: OperationKind) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: kind.name().to_string(),
        description: kind.description().to_string(),
        input_schema: input_schema(kind),
    };

    let dispatcher = dispatcher.clone();
    let executor: ToolExecutorFn = Arc::new(move |arguments, signal| {
        let dispatcher = dispatcher.clone();
        Box::pin(async move {
            let params = Params::from_object(arguments);
            dispatcher.dispatch(kind, &params, &signal).await
        })
    });

    (tool, executor)
}

/// A registry holding one tool per catalogue operation.
#[must_use]
pub fn catalogue_registry(dispatcher: &OperationDispatcher) -> ToolRegistry {
    let registry = ToolRegistry::new();
    for kind in OperationKind::ALL {
        let (tool, executor) = operation_tool(dispatcher, kind);
        registry.register(tool, executor);
    }
    registry
}
