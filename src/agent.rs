//! Agent loop - drives a tool-calling conversation to completion.
//!
//! ```text
//! User Query
//!     |
//!     v
//! +--------+     +-------+     +-------+
//! |  LLM   |<--->| Agent |<--->| Tools |
//! +--------+     +-------+     +-------+
//!     |               |
//!     v               v
//! Final Reply    ToolCallRecords
//! ```
//!
//! Each turn sends the whole conversation plus the tool definitions. A reply
//! without tool calls ends the loop. Otherwise every requested call is
//! dispatched in order and its result appended before the next request.
//! The call counter grows by the number of calls in a turn, so one turn
//! with many parallel calls can exhaust the ceiling on its own. Once the
//! ceiling is reached, one last request without tools asks for closing text.

use crate::error::Result;
use crate::llm::LlmProvider;
use crate::tools::{execute_tool, ToolRegistry};
use crate::types::{ChatRequest, GenerationParams, LoopResult, Message};

/// Default ceiling on dispatched tool calls per query.
pub const DEFAULT_MAX_FUNCTION_CALLS: usize = 5;

/// The Agent holds the provider and tools. It keeps no per-query state,
/// so one instance can serve many queries, concurrently if needed.
pub struct Agent {
    llm: Box<dyn LlmProvider>,
    tools: ToolRegistry,
    max_function_calls: usize,
}

impl Agent {
    pub fn new(llm: Box<dyn LlmProvider>, tools: ToolRegistry) -> Self {
        Self {
            llm,
            tools,
            max_function_calls: DEFAULT_MAX_FUNCTION_CALLS,
        }
    }

    pub fn with_max_function_calls(mut self, max_function_calls: usize) -> Self {
        self.max_function_calls = max_function_calls;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one query through the loop. Any provider, argument or tool
    /// failure aborts the run and is returned after being logged.
    pub async fn process_query(&self, query: &str, params: &GenerationParams) -> Result<LoopResult> {
        match self.run(query, params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::error!(provider = self.llm.name(), "Error in tool-enabled conversation: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&self, query: &str, params: &GenerationParams) -> Result<LoopResult> {
        let mut conversation = vec![Message::user(query)];
        let mut function_calls = Vec::new();
        let mut call_count = 0;
        let definitions = self.tools.definitions();

        while call_count < self.max_function_calls {
            let request = ChatRequest::new(conversation.clone(), params)
                .with_tools(definitions.clone(), params.parallel_tool_calls);
            let response = self.llm.chat_completion(&request).await?;
            conversation.push(response.to_message());

            if !response.has_tool_calls() {
                return Ok(LoopResult {
                    conversation,
                    function_calls,
                    final_response: response.content,
                    max_calls_reached: false,
                });
            }

            call_count += response.tool_calls.len();
            tracing::debug!(
                turn_calls = response.tool_calls.len(),
                call_count,
                "Dispatching tool calls"
            );

            for call in &response.tool_calls {
                let (record, message) = execute_tool(&self.tools, call).await?;
                function_calls.push(record);
                conversation.push(message);
            }
        }

        tracing::info!(
            max_function_calls = self.max_function_calls,
            "Function call ceiling reached, requesting final response"
        );
        let request = ChatRequest::new(conversation.clone(), params);
        let response = self.llm.chat_completion(&request).await?;
        // Tool calls in the closing reply are never answered, so drop them.
        let mut closing = response.to_message();
        closing.tool_calls.clear();
        conversation.push(closing);

        Ok(LoopResult {
            conversation,
            function_calls,
            final_response: response.content,
            max_calls_reached: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::llm::mock::MockProvider;
    use crate::tools::create_default_registry;
    use crate::types::{ChatResponse, Role, ToolCall, ToolChoice};
    use std::sync::Arc;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    fn agent(mock: &Arc<MockProvider>) -> Agent {
        Agent::new(Box::new(mock.clone()), create_default_registry())
    }

    #[test]
    fn test_plain_reply_ends_loop() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_text("AI is a field of computer science.");

            let result = agent(&mock)
                .process_query("Tell me about artificial intelligence.", &GenerationParams::default())
                .await
                .unwrap();

            assert!(result.function_calls.is_empty());
            assert!(!result.max_calls_reached);
            assert_eq!(
                result.final_response.as_deref(),
                Some("AI is a field of computer science.")
            );
            assert_eq!(result.conversation.len(), 2);
            assert_eq!(result.conversation[0], Message::user("Tell me about artificial intelligence."));

            let requests = mock.requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].tools.len(), 4);
            assert_eq!(requests[0].tool_choice, Some(ToolChoice::Auto));
            assert_eq!(requests[0].parallel_tool_calls, Some(true));
        });
    }

    #[test]
    fn test_tool_messages_follow_request_order() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_tool_calls(vec![
                ToolCall::new("call_a", "get_weather", r#"{"location":"Tokyo"}"#),
                ToolCall::new("call_b", "send_email", r#"{}"#),
                ToolCall::new("call_c", "get_weather", r#"{"location":"London"}"#),
            ]);
            mock.queue_text("Done.");

            let result = agent(&mock)
                .process_query("Weather in Tokyo and London?", &GenerationParams::default())
                .await
                .unwrap();

            let names: Vec<_> = result.function_calls.iter().map(|r| r.function_name.as_str()).collect();
            assert_eq!(names, vec!["get_weather", "send_email", "get_weather"]);
            assert_eq!(
                result.function_calls[1].function_response["error"],
                "send_email not implemented"
            );

            // user, assistant(tool calls), 3 tool results, assistant
            assert_eq!(result.conversation.len(), 6);
            assert_eq!(result.conversation[1].tool_calls.len(), 3);
            let ids: Vec<_> = result.conversation[2..5]
                .iter()
                .map(|m| {
                    assert_eq!(m.role, Role::Tool);
                    m.tool_call_id.clone().unwrap()
                })
                .collect();
            assert_eq!(ids, vec!["call_a", "call_b", "call_c"]);

            // the second request sees every tool result
            let requests = mock.requests();
            assert_eq!(requests.len(), 2);
            assert_eq!(requests[1].messages.len(), 5);
        });
    }

    #[test]
    fn test_ceiling_forces_final_request_without_tools() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            for i in 0..5 {
                mock.queue_tool_calls(vec![ToolCall::new(
                    format!("call_{}", i),
                    "get_datetime",
                    "{}",
                )]);
            }
            mock.queue_text("Here is the time.");

            let result = agent(&mock)
                .process_query("What time is it?", &GenerationParams::default())
                .await
                .unwrap();

            assert!(result.max_calls_reached);
            assert_eq!(result.function_calls.len(), 5);
            assert_eq!(result.final_response.as_deref(), Some("Here is the time."));

            let requests = mock.requests();
            assert_eq!(requests.len(), 6);
            assert!(requests[..5].iter().all(|r| r.tools.len() == 4));
            let last = &requests[5];
            assert!(last.tools.is_empty());
            assert_eq!(last.tool_choice, None);
            assert_eq!(last.parallel_tool_calls, None);
        });
    }

    #[test]
    fn test_parallel_calls_count_individually() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_tool_calls(
                (0..3)
                    .map(|i| ToolCall::new(format!("c{}", i), "get_weather", r#"{"location":"Paris"}"#))
                    .collect(),
            );
            mock.queue_text("Summary.");

            let result = agent(&mock)
                .with_max_function_calls(3)
                .process_query("Weather x3", &GenerationParams::default())
                .await
                .unwrap();

            assert!(result.max_calls_reached);
            assert_eq!(result.function_calls.len(), 3);
            assert_eq!(mock.request_count(), 2);
        });
    }

    #[test]
    fn test_zero_ceiling_goes_straight_to_final_request() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_text("No tools for you.");

            let result = agent(&mock)
                .with_max_function_calls(0)
                .process_query("hi", &GenerationParams::default())
                .await
                .unwrap();

            assert!(result.max_calls_reached);
            assert!(mock.requests()[0].tools.is_empty());
        });
    }

    #[test]
    fn test_empty_registry_sends_no_tools() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_text("hello");

            let agent = Agent::new(Box::new(mock.clone()), ToolRegistry::new());
            agent.process_query("hi", &GenerationParams::default()).await.unwrap();

            let request = &mock.requests()[0];
            assert!(request.tools.is_empty());
            assert_eq!(request.tool_choice, None);
        });
    }

    #[test]
    fn test_malformed_arguments_abort() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_tool_calls(vec![ToolCall::new("c1", "get_weather", "{not json")]);
            mock.queue_text("unreachable");

            let err = agent(&mock)
                .process_query("weather?", &GenerationParams::default())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidToolArguments { .. }));
            assert_eq!(mock.request_count(), 1);
        });
    }

    #[test]
    fn test_provider_failure_aborts() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_error(Error::Api {
                status: 500,
                body: "boom".into(),
            });

            let result = agent(&mock)
                .process_query("hi", &GenerationParams::default())
                .await;
            assert!(matches!(result, Err(Error::Api { status: 500, .. })));
        });
    }

    #[test]
    fn test_final_reply_without_content() {
        rt().block_on(async {
            let mock = Arc::new(MockProvider::new());
            mock.queue_response(ChatResponse {
                content: None,
                ..ChatResponse::text("")
            });

            let result = agent(&mock)
                .process_query("hi", &GenerationParams::default())
                .await
                .unwrap();
            assert_eq!(result.final_response, None);
            assert_eq!(result.conversation[1].content, "");
        });
    }
}
