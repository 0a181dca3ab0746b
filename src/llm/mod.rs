//! Completion client module.
//!
//! `LlmProvider` is the one operation the rest of the crate consumes:
//! submit a `ChatRequest`, get back a single `ChatResponse`.
//!
//! - `azure_openai`: the HTTP implementation against an Azure OpenAI deployment
//! - `retry`: a decorator adding bounded exponential backoff on transient errors
//! - `mock`: a scripted provider that records every request, for tests

pub mod azure_openai;
pub mod mock;
pub mod retry;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// Trait that all completion clients implement.
///
/// Implementations own credential resolution and transport. Callers treat
/// every call as fallible.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and wait for the full reply.
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Return the provider's display name (for logging).
    fn name(&self) -> &str;
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for Box<P> {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
        (**self).chat_completion(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for std::sync::Arc<P> {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
        (**self).chat_completion(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
