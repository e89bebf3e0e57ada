//! LLM agents: an instruction, a model and the hooks run around it
//!
//! An agent performs exactly one model call per turn. The order within a
//! turn is fixed: every before hook completes, then the model is called,
//! then every after hook runs on the response in registration order.

use crate::errors::Result;
use crate::hooks::{AfterModelCallback, BeforeModelCallback, RoleHooks};
use crate::memory::ResumeStore;
use crate::model::ModelBackend;
use crate::observability::ObservabilitySink;
use crate::prompts::{CRITIC_PROMPT, RESUME_CREATOR_PROMPT, REVISER_PROMPT};
use crate::types::{AgentRole, CallbackContext, LlmRequest, LlmResponse, Session, Tool};
use std::sync::Arc;
use tracing::debug;

/// A single LLM agent
pub struct LlmAgent {
    name: String,
    role: AgentRole,
    instruction: String,
    tools: Vec<Tool>,
    model: Arc<dyn ModelBackend>,
    before: Vec<Arc<dyn BeforeModelCallback>>,
    after: Vec<Arc<dyn AfterModelCallback>>,
}

impl LlmAgent {
    /// Start building an agent for a role
    pub fn builder(role: AgentRole, model: Arc<dyn ModelBackend>) -> AgentBuilder {
        AgentBuilder::new(role, model)
    }

    /// Agent name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Agent role
    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// System instruction
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Tools offered to the model
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Run one turn.
    ///
    /// The session state is lent to the hooks for the duration of the turn
    /// and handed back afterwards, including any changes they made.
    pub async fn run(&self, session: &mut Session, mut request: LlmRequest) -> Result<LlmResponse> {
        if !self.instruction.is_empty() {
            request.system_instruction = Some(self.instruction.clone());
        }
        request.tools = self.tools.clone();

        let mut context = CallbackContext {
            agent_name: self.name.clone(),
            role: self.role,
            session_id: session.id.clone(),
            session_state: session.state.take(),
        };

        for hook in &self.before {
            hook.before_model(&mut context, &mut request).await;
        }

        debug!(agent = %self.name, model = self.model.name(), "Calling model");
        let result = self.model.generate(&request).await;

        let result = match result {
            Ok(mut response) => {
                for hook in &self.after {
                    response = hook.after_model(&mut context, response).await;
                }
                Ok(response)
            },
            Err(e) => Err(e),
        };

        session.state = context.session_state;
        result
    }
}

/// Builder for [`LlmAgent`]
pub struct AgentBuilder {
    agent: LlmAgent,
}

impl AgentBuilder {
    /// Create a builder with the role's default name and no hooks
    pub fn new(role: AgentRole, model: Arc<dyn ModelBackend>) -> Self {
        Self {
            agent: LlmAgent {
                name: role.default_name().to_string(),
                role,
                instruction: String::new(),
                tools: Vec::new(),
                model,
                before: Vec::new(),
                after: Vec::new(),
            },
        }
    }

    /// Set the agent name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.agent.name = name.into();
        self
    }

    /// Set the system instruction
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.agent.instruction = instruction.into();
        self
    }

    /// Offer a tool to the model
    pub fn tool(mut self, tool: Tool) -> Self {
        self.agent.tools.push(tool);
        self
    }

    /// Add a before-model hook
    pub fn before_model(mut self, hook: Arc<dyn BeforeModelCallback>) -> Self {
        self.agent.before.push(hook);
        self
    }

    /// Add an after-model hook
    pub fn after_model(mut self, hook: Arc<dyn AfterModelCallback>) -> Self {
        self.agent.after.push(hook);
        self
    }

    /// Add a complete set of role hooks
    pub fn hooks(mut self, hooks: RoleHooks) -> Self {
        self.agent.before.extend(hooks.before);
        self.agent.after.extend(hooks.after);
        self
    }

    /// Build the agent
    pub fn build(self) -> LlmAgent {
        self.agent
    }
}

/// Critic: checks claims with web search and cites its sources
pub fn critic_agent(model: Arc<dyn ModelBackend>, sink: Arc<dyn ObservabilitySink>) -> LlmAgent {
    LlmAgent::builder(AgentRole::Critic, model)
        .instruction(CRITIC_PROMPT)
        .tool(Tool::google_search())
        .hooks(RoleHooks::for_role(AgentRole::Critic, None, sink))
        .build()
}

/// Reviser: corrects the answer according to the critic's findings
pub fn reviser_agent(model: Arc<dyn ModelBackend>, sink: Arc<dyn ObservabilitySink>) -> LlmAgent {
    LlmAgent::builder(AgentRole::Reviser, model)
        .instruction(REVISER_PROMPT.as_str())
        .hooks(RoleHooks::for_role(AgentRole::Reviser, None, sink))
        .build()
}

/// Resume generator: writes resumes and remembers them per user
///
/// Without a store the agent still works but neither injects nor persists.
pub fn resume_generator_agent(
    model: Arc<dyn ModelBackend>,
    store: Option<Arc<dyn ResumeStore>>,
    sink: Arc<dyn ObservabilitySink>,
) -> LlmAgent {
    LlmAgent::builder(AgentRole::ResumeGenerator, model)
        .instruction(RESUME_CREATOR_PROMPT)
        .hooks(RoleHooks::for_role(AgentRole::ResumeGenerator, store, sink))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::END_OF_EDIT_MARK;
    use crate::model::ScriptedModel;
    use crate::observability::{MemorySink, TrafficEvent};
    use crate::types::GroundingChunk;

    #[tokio::test]
    async fn test_run_sets_instruction_and_tools() {
        let model = Arc::new(ScriptedModel::always("ok"));
        let sink = Arc::new(MemorySink::new());
        let agent = critic_agent(model.clone(), sink);

        let mut session = Session::default();
        agent
            .run(&mut session, LlmRequest::from_user_text("Q"))
            .await
            .unwrap();

        let sent = model.last_request().unwrap();
        assert_eq!(sent.system_instruction.as_deref(), Some(CRITIC_PROMPT));
        assert_eq!(sent.tools, vec![Tool::google_search()]);
    }

    #[tokio::test]
    async fn test_hooks_run_in_order() {
        let model = Arc::new(ScriptedModel::new([LlmResponse::from_text("answer")
            .with_grounding(vec![GroundingChunk::web("Doc", "http://doc")])]));
        let sink = Arc::new(MemorySink::new());
        let agent = critic_agent(model, sink.clone());

        let response = agent
            .run(&mut Session::default(), LlmRequest::from_user_text("Q"))
            .await
            .unwrap();

        let expected = "answer\n\n\nReference:\n\n* [Doc](http://doc)\n";
        assert_eq!(response.text(), expected);
        assert_eq!(
            sink.events(),
            vec![
                TrafficEvent::Query {
                    agent: "critic_agent".into(),
                    text: "Q".into(),
                },
                TrafficEvent::Response {
                    agent: "critic_agent".into(),
                    text: expected.into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_reviser_truncates() {
        let model = Arc::new(ScriptedModel::always(format!(
            "Fixed. {END_OF_EDIT_MARK} notes"
        )));
        let agent = reviser_agent(model, Arc::new(MemorySink::new()));

        let response = agent
            .run(&mut Session::default(), LlmRequest::from_user_text("Q"))
            .await
            .unwrap();
        assert_eq!(response.text(), "Fixed. ");
    }

    #[tokio::test]
    async fn test_model_error_returns_state() {
        let model = Arc::new(ScriptedModel::default());
        let agent = reviser_agent(model, Arc::new(MemorySink::new()));
        let mut session = Session::new("s1");

        let result = agent.run(&mut session, LlmRequest::from_user_text("Q")).await;

        assert!(result.is_err());
        assert!(session.state.is_some());
    }
}
