//! Dispatch of a single tool call.
//!
//! Parse failures (including arguments that are not a JSON object) and
//! handler failures are errors. An unknown tool name is
//! not: it becomes an `{"error": "<name> not implemented"}` payload that is
//! sent back to the model like any other result.

use serde_json::{json, Map, Value};

use super::ToolRegistry;
use crate::error::{Error, Result};
use crate::types::{Message, ToolCall, ToolCallRecord};

/// Resolve one tool call into its record and the tool message to append.
pub async fn execute_tool(
    registry: &ToolRegistry,
    call: &ToolCall,
) -> Result<(ToolCallRecord, Message)> {
    // Arguments are keyword arguments: anything but a JSON object is malformed.
    let function_args = serde_json::from_str::<Map<String, Value>>(&call.arguments)
        .map(Value::Object)
        .map_err(|source| Error::InvalidToolArguments {
            tool: call.name.clone(),
            source,
        })?;

    tracing::info!(tool = %call.name, id = %call.id, "Model called function");

    let function_response = match registry.get(&call.name) {
        Some(tool) => tool
            .execute(function_args.clone())
            .await
            .map_err(|source| Error::ToolFailed {
                tool: call.name.clone(),
                source,
            })?,
        None => {
            tracing::error!(tool = %call.name, "Function not found in registry");
            not_implemented(&call.name)
        }
    };

    let content = serde_json::to_string(&function_response)
        .map_err(|e| Error::InvalidResponse(format!("Unserializable tool output: {}", e)))?;
    let message = Message::tool_result(&call.id, &call.name, content);

    Ok((
        ToolCallRecord {
            function_name: call.name.clone(),
            function_args,
            function_response,
        },
        message,
    ))
}

fn not_implemented(name: &str) -> Value {
    json!({ "error": format!("{} not implemented", name) })
}
