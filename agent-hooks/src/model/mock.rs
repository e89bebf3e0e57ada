//! In-memory scripted model for testing and offline runs
use super::ModelBackend;
use crate::{
    errors::{HookError, Result},
    types::{LlmRequest, LlmResponse},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A model that replays queued responses and records every request
///
/// Once the queue is empty it answers with the fallback response, or with
/// an error if none is set.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<LlmResponse>>,
    fallback: Option<LlmResponse>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedModel {
    /// Create a model replaying `responses` in order
    pub fn new(responses: impl IntoIterator<Item = LlmResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Create a model that always answers with the same text
    pub fn always(text: impl Into<String>) -> Self {
        Self::default().with_fallback(LlmResponse::from_text(text))
    }

    /// Answer with `response` once the queue is exhausted
    pub fn with_fallback(mut self, response: LlmResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Queue one more response
    pub fn push(&self, response: LlmResponse) {
        self.responses.lock().push_back(response);
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<LlmRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl ModelBackend for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| HookError::model("scripted model has no responses left", None))
    }
}
