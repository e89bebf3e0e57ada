//! One-shot driver for the resume generator

use crate::agent::{LlmAgent, resume_generator_agent};
use crate::errors::Result;
use crate::hooks::PREVIOUS_RESUME_KEY;
use crate::memory::ResumeStore;
use crate::model::ModelBackend;
use crate::observability::ObservabilitySink;
use crate::prompts::build_dynamic_prompt;
use crate::types::{LlmRequest, LlmResponse, Session};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Runs the resume generator for a single request
pub struct ResumeRunner {
    agent: LlmAgent,
    store: Option<Arc<dyn ResumeStore>>,
}

impl ResumeRunner {
    /// Create a runner; without a store nothing is loaded or persisted
    pub fn new(
        model: Arc<dyn ModelBackend>,
        store: Option<Arc<dyn ResumeStore>>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Self {
        let agent = resume_generator_agent(model, store.clone(), sink);
        Self { agent, store }
    }

    /// The wrapped agent
    pub fn agent(&self) -> &LlmAgent {
        &self.agent
    }

    /// Generate a resume from `candidate_info`.
    ///
    /// The prompt embeds the state's `previous_resume`. When the caller did
    /// not supply one it is filled from the record stored under the session
    /// id. The hooks still persist under the resolved key, so a `user_id`
    /// in the state takes precedence when saving.
    ///
    /// Returns the final response and the session id used, which is
    /// generated when the caller does not supply one.
    pub async fn run(
        &self,
        candidate_info: &str,
        session_id: Option<String>,
        session_state: Option<Value>,
    ) -> Result<(LlmResponse, String)> {
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut state = match session_state {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        state
            .entry("session_id")
            .or_insert_with(|| Value::String(session_id.clone()));

        if !state.contains_key(PREVIOUS_RESUME_KEY) {
            let previous = self.previous_resume(&session_id).await;
            state.insert(PREVIOUS_RESUME_KEY.to_string(), Value::String(previous));
        }

        let previous = state
            .get(PREVIOUS_RESUME_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let prompt = build_dynamic_prompt(previous, candidate_info);

        info!(session_id = %session_id, "Generating resume");
        let mut session = Session::new(session_id.clone()).with_state(Value::Object(state));
        let response = self
            .agent
            .run(&mut session, LlmRequest::from_user_text(prompt))
            .await?;

        Ok((response, session_id))
    }

    /// Stored record for the session, empty when there is none.
    async fn previous_resume(&self, session_id: &str) -> String {
        let Some(store) = &self.store else {
            return String::new();
        };

        match store.load(session_id).await {
            Ok(text) => text,
            Err(e) => {
                warn!(session_id, error = %e, "Failed to load previous resume");
                String::new()
            },
        }
    }
}
