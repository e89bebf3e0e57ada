//! After-model hook logging every response part.

use super::AfterModelCallback;
use crate::observability::{ObservabilitySink, TrafficEvent};
use crate::types::{CallbackContext, LlmResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Records text parts as responses and call parts as function calls.
pub struct ResponseLogger {
    sink: Arc<dyn ObservabilitySink>,
}

impl ResponseLogger {
    /// Creates a logger writing to `sink`.
    pub fn new(sink: Arc<dyn ObservabilitySink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl AfterModelCallback for ResponseLogger {
    async fn after_model(
        &self,
        context: &mut CallbackContext,
        response: LlmResponse,
    ) -> LlmResponse {
        for part in response.parts() {
            let event = match (&part.text, &part.function_call) {
                (Some(text), _) if !text.is_empty() => TrafficEvent::Response {
                    agent: context.agent_name.clone(),
                    text: text.clone(),
                },
                (_, Some(call)) => TrafficEvent::FunctionCall {
                    agent: context.agent_name.clone(),
                    name: call.name.clone(),
                },
                _ => continue,
            };
            self.sink.record(event);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::MemorySink;
    use crate::types::{AgentRole, Part};

    #[tokio::test]
    async fn test_logs_text_and_calls() {
        let sink = Arc::new(MemorySink::new());
        let logger = ResponseLogger::new(sink.clone());
        let response = LlmResponse::from_parts(vec![
            Part::text("Checking."),
            Part::function_call("google_search", serde_json::json!({"q": "x"})),
            Part::text(""),
        ]);

        let mut ctx = CallbackContext::new(AgentRole::Critic);
        let returned = logger.after_model(&mut ctx, response.clone()).await;

        assert_eq!(returned, response);
        assert_eq!(
            sink.events(),
            vec![
                TrafficEvent::Response {
                    agent: "critic_agent".into(),
                    text: "Checking.".into(),
                },
                TrafficEvent::FunctionCall {
                    agent: "critic_agent".into(),
                    name: "google_search".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_response_logs_nothing() {
        let sink = Arc::new(MemorySink::new());
        let logger = ResponseLogger::new(sink.clone());
        let mut ctx = CallbackContext::new(AgentRole::Reviser);

        logger.after_model(&mut ctx, LlmResponse::default()).await;
        assert!(sink.events().is_empty());
    }
}
