//! Before-model hook: query logging and resume memory injection.

use super::BeforeModelCallback;
use crate::memory::{ResumeStore, looks_like_full_info, resolve_persistence_key};
use crate::observability::{ObservabilitySink, TrafficEvent};
use crate::types::{AgentRole, CallbackContext, LlmRequest, USER_ROLE};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// First line of an injected prompt.
pub const STORED_RESUME_HEADER: &str = "Stored resume for this user (from previous sessions):";

/// Header introducing the original user text in an injected prompt.
pub const USER_REQUEST_HEADER: &str = "User request:";

/// Logs the outgoing query and, for the resume generator, prepends the
/// stored resume to short retrieval requests ("show my resume").
///
/// Messages that already look like full candidate information are left
/// alone so a fresh resume is generated from the new data only.
pub struct MemoryInjector {
    /// Only set when memory injection applies to this hook's role
    memory: Option<Arc<dyn ResumeStore>>,
    sink: Arc<dyn ObservabilitySink>,
}

impl MemoryInjector {
    /// Creates an injector that only logs.
    pub fn logging_only(sink: Arc<dyn ObservabilitySink>) -> Self {
        Self { memory: None, sink }
    }

    /// Creates the injector for a role.
    ///
    /// Memory is wired in only for the resume generator and only when a
    /// store is present and available.
    pub fn for_role(
        role: AgentRole,
        store: Option<Arc<dyn ResumeStore>>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Self {
        let memory = match role {
            AgentRole::ResumeGenerator => store.filter(|store| store.is_available()),
            AgentRole::Critic | AgentRole::Reviser => None,
        };
        Self { memory, sink }
    }

    /// Whether this injector can splice stored resumes into prompts.
    pub fn injects_memory(&self) -> bool {
        self.memory.is_some()
    }

    async fn stored_resume(&self, store: &dyn ResumeStore, context: &CallbackContext) -> String {
        let key = resolve_persistence_key(context);
        match store.load(&key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to load stored resume, skipping injection");
                String::new()
            },
        }
    }
}

#[async_trait]
impl BeforeModelCallback for MemoryInjector {
    async fn before_model(&self, context: &mut CallbackContext, request: &mut LlmRequest) {
        let Some(last) = request.contents.last_mut() else {
            return;
        };
        if last.role != USER_ROLE {
            return;
        }
        let Some(part) = last.parts.last_mut() else {
            return;
        };
        let original = match part.text.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => return,
        };

        if let Some(store) = &self.memory
            && !looks_like_full_info(&original)
        {
            let stored = self.stored_resume(store.as_ref(), context).await;
            if !stored.is_empty() {
                debug!(agent = %context.agent_name, "Injecting stored resume into prompt");
                part.text = Some(format!(
                    "{STORED_RESUME_HEADER}\n{stored}\n\n{USER_REQUEST_HEADER}\n{original}"
                ));
            }
        }

        self.sink.record(TrafficEvent::Query {
            agent: context.agent_name.clone(),
            text: part.text.clone().unwrap_or_default(),
        });
    }
}
