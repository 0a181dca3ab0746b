//! basic-llm-call: a tool-calling conversation loop and structured output
//! requests over the Azure OpenAI chat completion API.
//!
//! ```text
//! Agent::process_query ──> LlmProvider ──> (tool calls?) ──> tools::execute_tool
//!        ^                                                         |
//!        +─────────────── tool result messages <───────────────────+
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod structured;
pub mod tools;
pub mod types;
pub mod workflow;

pub use agent::Agent;
pub use error::{Error, Result};
pub use llm::LlmProvider;
pub use tools::{create_default_registry, Tool, ToolRegistry};
pub use types::{GenerationParams, LoopResult, Message, ToolCall, ToolCallRecord};
