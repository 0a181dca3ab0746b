//! Scripted provider for tests and offline runs.
//!
//! [`MockProvider`] pops queued replies (or errors) in order and records
//! every `ChatRequest` it receives, so callers can assert how many requests
//! were issued and what each one carried. Once the queue is empty it repeats
//! the fallback reply if one is set, otherwise it fails.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::LlmProvider;
use crate::error::{Error, Result};
use crate::types::{ChatRequest, ChatResponse, ToolCall};

#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<ChatResponse>>>,
    fallback: Mutex<Option<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_response(&self, response: ChatResponse) {
        lock(&self.replies).push_back(Ok(response));
    }

    pub fn queue_text(&self, content: impl Into<String>) {
        self.queue_response(ChatResponse::text(content));
    }

    pub fn queue_tool_calls(&self, tool_calls: Vec<ToolCall>) {
        self.queue_response(ChatResponse::tool_calls(tool_calls));
    }

    pub fn queue_error(&self, error: Error) {
        lock(&self.replies).push_back(Err(error));
    }

    /// Reply returned for every request once the queue runs dry.
    pub fn set_fallback(&self, response: ChatResponse) {
        *lock(&self.fallback) = Some(response);
    }

    /// Snapshot of every request received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
        lock(&self.requests).push(request.clone());

        if let Some(reply) = lock(&self.replies).pop_front() {
            return reply;
        }
        lock(&self.fallback)
            .clone()
            .ok_or_else(|| Error::InvalidResponse("mock provider has no queued reply".to_string()))
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationParams, Message};

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    #[test]
    fn test_queue_then_fallback() {
        rt().block_on(async {
            let mock = MockProvider::new();
            mock.queue_text("first");
            mock.set_fallback(ChatResponse::text("again"));
            let req = ChatRequest::new(vec![Message::user("hi")], &GenerationParams::default());

            let a = mock.chat_completion(&req).await.unwrap();
            let b = mock.chat_completion(&req).await.unwrap();
            let c = mock.chat_completion(&req).await.unwrap();
            assert_eq!(a.content.as_deref(), Some("first"));
            assert_eq!(b.content.as_deref(), Some("again"));
            assert_eq!(c.content.as_deref(), Some("again"));
            assert_eq!(mock.request_count(), 3);
        });
    }

    #[test]
    fn test_empty_queue_fails() {
        rt().block_on(async {
            let mock = MockProvider::new();
            let req = ChatRequest::new(vec![], &GenerationParams::default());
            assert!(mock.chat_completion(&req).await.is_err());
            assert_eq!(mock.requests().len(), 1);
        });
    }
}
