//! Plain prompt workflows without tools.
//!
//! Each workflow issues its requests through whatever provider it is given;
//! wrap it in `RetryProvider` to get backoff on transient failures.

use crate::error::{Error, Result};
use crate::llm::LlmProvider;
use crate::types::{ChatRequest, GenerationParams, Message};

/// Output of [`multi_step`].
#[derive(Debug, Clone, PartialEq)]
pub struct MultiStepResult {
    pub intent_analysis: String,
    pub final_answer: String,
}

async fn complete(
    provider: &dyn LlmProvider,
    messages: Vec<Message>,
    params: &GenerationParams,
) -> Result<String> {
    let response = provider
        .chat_completion(&ChatRequest::new(messages, params))
        .await?;
    response
        .content
        .map(|text| text.trim().to_string())
        .ok_or_else(|| Error::InvalidResponse("Reply has no text content".to_string()))
}

/// Send one prompt wrapping `query` and return the reply text.
pub async fn single_prompt(
    provider: &dyn LlmProvider,
    query: &str,
    params: &GenerationParams,
) -> Result<String> {
    tracing::info!(query, "Processing query");
    let prompt = format!(
        "You are a helpful assistant. Please respond to this query: {}",
        query
    );
    complete(provider, vec![Message::user(prompt)], params).await
}

/// Parameters used by [`chat`] when the caller has no preference.
pub fn chat_params() -> GenerationParams {
    GenerationParams::default()
        .with_temperature(0.8)
        .with_max_tokens(500)
}

/// Continue a caller-supplied conversation and return the reply text.
pub async fn chat(
    provider: &dyn LlmProvider,
    messages: Vec<Message>,
    params: &GenerationParams,
) -> Result<String> {
    tracing::info!(messages = messages.len(), "Processing chat");
    complete(provider, messages, params).await
}

/// Two requests: classify the query's intent, then answer it with the
/// analysis in context.
pub async fn multi_step(
    provider: &dyn LlmProvider,
    query: &str,
    params: &GenerationParams,
) -> Result<MultiStepResult> {
    tracing::info!(query, "Starting multi-step workflow");

    let analysis_prompt = vec![
        Message::system(
            "You are an AI assistant that analyzes user queries to determine their intent.",
        ),
        Message::user(format!(
            "Analyze this query and categorize the primary intent: {}",
            query
        )),
    ];
    let intent_analysis = complete(provider, analysis_prompt, params).await?;
    tracing::debug!(intent = %intent_analysis, "Query intent analyzed");

    let response_prompt = vec![
        Message::system("You are a helpful assistant providing information."),
        Message::user(query),
        Message::assistant(format!(
            "I understand your intent is related to: {}",
            intent_analysis
        )),
        Message::user("Please provide a helpful response to my query."),
    ];
    let final_answer = complete(provider, response_prompt, params).await?;

    tracing::info!("Multi-step workflow completed");
    Ok(MultiStepResult {
        intent_analysis,
        final_answer,
    })
}
