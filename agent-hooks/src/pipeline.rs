//! Sequential composition of agents

use crate::agent::{LlmAgent, critic_agent, reviser_agent};
use crate::errors::{HookError, Result};
use crate::model::ModelBackend;
use crate::observability::ObservabilitySink;
use crate::types::{Content, LlmRequest, LlmResponse, Session};
use std::sync::Arc;
use tracing::info;

/// Runs agents one after another over a shared conversation.
///
/// Each agent sees the original user message followed by what every
/// earlier agent said, presented as user-role context turns.
pub struct SequentialPipeline {
    name: String,
    description: String,
    agents: Vec<LlmAgent>,
}

impl SequentialPipeline {
    /// Creates a pipeline.
    pub fn new(name: impl Into<String>, description: impl Into<String>, agents: Vec<LlmAgent>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            agents,
        }
    }

    /// Pipeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Agents in execution order.
    pub fn agents(&self) -> &[LlmAgent] {
        &self.agents
    }

    /// Runs every agent and returns the last agent's response.
    pub async fn run(&self, session: &mut Session, user_text: impl Into<String>) -> Result<LlmResponse> {
        let mut history = vec![Content::user(user_text)];
        let mut last = None;

        for agent in &self.agents {
            info!(pipeline = %self.name, agent = agent.name(), "Running agent");
            let request = LlmRequest {
                contents: history.clone(),
                ..Default::default()
            };
            let response = agent.run(session, request).await?;

            let said = response.text();
            if !said.is_empty() {
                history.push(context_turn(agent.name(), &said));
            }
            last = Some(response);
        }

        last.ok_or_else(|| HookError::EmptyPipeline(self.name.clone()))
    }
}

/// Presents an earlier agent's output to the next agent.
fn context_turn(agent: &str, text: &str) -> Content {
    Content::user(format!("For context:\n[{agent}] said: {text}"))
}

/// Critic followed by reviser: verifies an answer against the web and
/// rewrites it where it is wrong.
pub fn llm_auditor(model: Arc<dyn ModelBackend>, sink: Arc<dyn ObservabilitySink>) -> SequentialPipeline {
    SequentialPipeline::new(
        "llm_auditor",
        "Evaluates LLM-generated answers, verifies actual accuracy using the web, \
         and refines the response to ensure alignment with real-world knowledge.",
        vec![critic_agent(model.clone(), sink.clone()), reviser_agent(model, sink)],
    )
}
