//! Tool system module.
//!
//! - **Tool trait**: every tool provides its name, description, a JSON Schema
//!   for its parameters, and an execute method returning a JSON payload
//! - **ToolRegistry**: holds the registered tools, produces the definitions
//!   sent to the model, and resolves tool names to implementations
//! - **executor**: dispatches one tool call against a registry

pub mod calendar;
pub mod datetime;
pub mod executor;
pub mod reminder;
pub mod weather;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::types::ToolDefinition;

pub use executor::execute_tool;

/// Trait that all tools must implement.
///
/// Tools receive the parsed JSON arguments and return a JSON payload that is
/// serialized into the tool result message. An `Err` aborts the whole
/// conversation loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g. "get_weather").
    fn name(&self) -> &str;

    /// A human-readable description the model reads to decide when to call it.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given JSON arguments.
    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Name-keyed set of tools.
///
/// Registration order is preserved so the definitions reach the model in
/// the same order every time. Registering a name twice replaces the earlier
/// tool in place.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.register(Arc::new(tool));
        self
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Create a registry with the weather, calendar, reminder and datetime tools.
pub fn create_default_registry() -> ToolRegistry {
    ToolRegistry::new()
        .with_tool(weather::WeatherTool)
        .with_tool(calendar::CalendarTool)
        .with_tool(reminder::ReminderTool)
        .with_tool(datetime::DateTimeTool)
}

/// Local wall-clock time as ISO 8601 with microseconds, no offset.
pub(crate) fn local_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
