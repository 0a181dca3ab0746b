//! Core data types used throughout basic-llm-call.
//!
//! This module defines the message types, tool call structures,
//! and request/response formats that flow between the conversation
//! loop, the tool executor, and the completion client.

use serde::{Deserialize, Serialize};

// --- Message Roles ---

/// The role of a message in the conversation.
///
/// - `System`: instructions to the model
/// - `User`: the human's input
/// - `Assistant`: the model's reply
/// - `Tool`: the result of a tool execution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

// --- Tool Call ---

/// A tool call request emitted by the model.
///
/// `arguments` is the raw JSON-encoded payload exactly as the model sent it;
/// it is parsed only when the call is dispatched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Identifier used to correlate the tool result message
    pub id: String,
    /// Name of the tool to invoke (e.g. "get_weather")
    pub name: String,
    /// JSON-encoded arguments for the tool
    pub arguments: String,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

// --- Tool Definition ---

/// Describes a tool's interface to the model via JSON Schema.
///
/// Tool definitions are static: they are built once from the registered
/// tools and sent unchanged with every tool-bearing request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// The tool's name (must match what the tool reports)
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON Schema object: `{type: "object", properties: {...}, required: [...]}`
    pub parameters: serde_json::Value,
}

// --- Messages ---

/// A single message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// If the assistant wants to call tools, this will be non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool result messages, this links back to the tool call ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// For tool result messages, the name of the tool that produced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    /// Create an assistant message (text reply from the model).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Create an assistant message that includes tool calls.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    /// Create a tool result message correlated with `tool_call_id`.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            ..Self::plain(Role::Tool, content)
        }
    }
}

// --- Request options ---

/// Tool selection policy sent with tool-bearing requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// Response format constraint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonObject,
}

/// Sampling parameters shared by every request a caller issues.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whether the model may return more than one tool call per turn.
    pub parallel_tool_calls: bool,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Option<Vec<String>>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            parallel_tool_calls: true,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
        }
    }
}

impl GenerationParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

// --- Chat Request / Response ---

/// A request to send to the completion client.
///
/// This is our internal representation; the provider converts it into
/// the wire format. The model/deployment is a property of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The conversation messages
    pub messages: Vec<Message>,
    /// Available tools (empty means the field is omitted entirely)
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<ToolChoice>,
    pub parallel_tool_calls: Option<bool>,
    pub response_format: Option<ResponseFormat>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Option<Vec<String>>,
}

impl ChatRequest {
    /// A plain request carrying `messages` and the sampling parameters,
    /// with no tools and no response format.
    pub fn new(messages: Vec<Message>, params: &GenerationParams) -> Self {
        Self {
            messages,
            tools: vec![],
            tool_choice: None,
            parallel_tool_calls: None,
            response_format: None,
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
            top_p: params.top_p,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
            stop: params.stop.clone(),
        }
    }

    /// Attach tool definitions with automatic tool selection.
    /// An empty set leaves the request tool-free.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>, parallel_tool_calls: bool) -> Self {
        if !tools.is_empty() {
            self.tools = tools;
            self.tool_choice = Some(ToolChoice::Auto);
            self.parallel_tool_calls = Some(parallel_tool_calls);
        }
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A single reply from the completion client.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub role: Role,
    /// The text content (absent when the model only requested tools)
    pub content: Option<String>,
    /// Tool calls the model wants to make, in the order it returned them
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// A text-only assistant reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: vec![],
            usage: None,
        }
    }

    /// An assistant reply requesting tools.
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            tool_calls,
            usage: None,
        }
    }

    /// Returns true if the model wants to call tools.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Convert into a conversation message. Absent content becomes "".
    pub fn to_message(&self) -> Message {
        Message {
            role: self.role,
            content: self.content.clone().unwrap_or_default(),
            tool_calls: self.tool_calls.clone(),
            tool_call_id: None,
            name: None,
        }
    }
}

// --- Loop output ---

/// The outcome of dispatching one tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRecord {
    pub function_name: String,
    pub function_args: serde_json::Value,
    /// Handler output, or `{"error": ...}` for an unregistered tool
    pub function_response: serde_json::Value,
}

/// Final state of one conversation loop run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopResult {
    pub conversation: Vec<Message>,
    /// Every dispatched call, in dispatch order
    pub function_calls: Vec<ToolCallRecord>,
    pub final_response: Option<String>,
    pub max_calls_reached: bool,
}
