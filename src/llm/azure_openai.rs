//! Azure OpenAI provider implementation.
//!
//! Requests go to
//! `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`
//! with the key in the `api-key` header.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::LlmProvider;
use crate::config::AzureConfig;
use crate::error::{Error, Result};
use crate::types::{
    ChatRequest, ChatResponse, ResponseFormat, Role, TokenUsage, ToolCall, ToolChoice,
};

pub struct AzureOpenAiProvider {
    api_key: String,
    endpoint: String,
    api_version: String,
    deployment: String,
    client: reqwest::Client,
}

// --- API Request Types ---

#[derive(Serialize, Debug)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallel_tool_calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize, Debug)]
struct ApiMessage {
    role: Role,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Serialize, Debug)]
struct ApiTool {
    r#type: &'static str,
    function: ApiFunction,
}

#[derive(Serialize, Debug)]
struct ApiFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ApiToolCall {
    id: String,
    #[serde(default = "function_type")]
    r#type: String,
    function: ApiToolCallFunction,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ApiToolCallFunction {
    name: String,
    arguments: String,
}

// --- API Response Types ---

#[derive(Deserialize, Debug)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize, Debug)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ApiResponseMessage {
    #[serde(default = "assistant_role")]
    role: Role,
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ApiToolCall>>,
}

fn assistant_role() -> Role {
    Role::Assistant
}

#[derive(Deserialize, Debug)]
struct ApiUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

// --- Implementation ---

impl AzureOpenAiProvider {
    /// Build a provider from configuration. Fails before any network
    /// activity when the key or endpoint is missing.
    pub fn from_config(config: &AzureConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::info!(
            endpoint = %credentials.endpoint,
            deployment = config.deployment_name(),
            "Using Azure OpenAI endpoint"
        );

        Ok(Self {
            api_key: credentials.api_key,
            endpoint: credentials.endpoint,
            api_version: config.api_version.clone(),
            deployment: config.deployment_name().to_string(),
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    fn build_api_request<'a>(&'a self, request: &ChatRequest) -> ApiRequest<'a> {
        let messages = request
            .messages
            .iter()
            .map(|msg| {
                let tool_calls = if msg.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        msg.tool_calls
                            .iter()
                            .map(|tc| ApiToolCall {
                                id: tc.id.clone(),
                                r#type: function_type(),
                                function: ApiToolCallFunction {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                };
                // An assistant turn that only carries tool calls has no content.
                let content = if msg.role == Role::Assistant
                    && msg.content.is_empty()
                    && tool_calls.is_some()
                {
                    None
                } else {
                    Some(msg.content.clone())
                };
                ApiMessage {
                    role: msg.role,
                    content,
                    tool_calls,
                    tool_call_id: msg.tool_call_id.clone(),
                    name: msg.name.clone(),
                }
            })
            .collect();

        let tools = request
            .tools
            .iter()
            .map(|t| ApiTool {
                r#type: "function",
                function: ApiFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect();

        ApiRequest {
            model: &self.deployment,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
            stop: request.stop.clone(),
            tools,
            tool_choice: request.tool_choice,
            parallel_tool_calls: request.parallel_tool_calls,
            response_format: request.response_format,
        }
    }

    fn parse_response(api_response: ApiResponse) -> Result<ChatResponse> {
        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            Error::InvalidResponse("Empty response from API: no choices returned".to_string())
        })?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let usage = api_response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens.unwrap_or(0),
            output_tokens: u.completion_tokens.unwrap_or(0),
        });

        Ok(ChatResponse {
            role: choice.message.role,
            content: choice.message.content,
            tool_calls,
            usage,
        })
    }
}

/// Map a non-success status to the error taxonomy the retry wrapper understands.
fn classify_status(status: StatusCode, body: String) -> Error {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited(body),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Error::Timeout(body),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => Error::ServiceUnavailable {
            status: status.as_u16(),
            body,
        },
        _ => Error::Api {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let api_request = self.build_api_request(request);
        let url = self.url();

        tracing::debug!(
            messages = api_request.messages.len(),
            tools = api_request.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(e.to_string())
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, error_body));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("Failed to parse API response: {}", e)))?;

        Self::parse_response(api_response)
    }

    fn name(&self) -> &str {
        "Azure OpenAI"
    }
}
