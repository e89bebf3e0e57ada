//! Model call hooks
//!
//! Hooks run around every model call of an agent: before hooks may rewrite
//! the outgoing request, after hooks receive the response and return the
//! (possibly rewritten) response.
//!
//! ## Available Hooks
//!
//! - `MemoryInjector`: logs the outgoing query and splices a stored resume
//!   into retrieval requests of the resume generator
//! - `ReferenceAnnotator`: appends grounding references (critic)
//! - `MarkerTruncator`: cuts output at the end-of-edit marker (reviser)
//! - `MergeAndPersist`: merges output and saves it as a resume (resume generator)
//! - `ResponseLogger`: logs every response part
//!
//! Hooks never fail. Any internal error is logged and the hook falls back
//! to leaving its input untouched.

mod injector;
mod logger;
mod persist;
mod references;
mod truncate;

pub use injector::{MemoryInjector, STORED_RESUME_HEADER, USER_REQUEST_HEADER};
pub use logger::ResponseLogger;
pub use persist::{MergeAndPersist, PREVIOUS_RESUME_KEY};
pub use references::{REFERENCE_HEADER, ReferenceAnnotator, render_references};
pub use truncate::{END_OF_EDIT_MARK, MarkerTruncator};

use crate::memory::ResumeStore;
use crate::observability::ObservabilitySink;
use crate::types::{AgentRole, CallbackContext, Content, LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Hook invoked before the model is called
#[async_trait]
pub trait BeforeModelCallback: Send + Sync {
    /// Inspect and possibly rewrite the outgoing request in place
    async fn before_model(&self, context: &mut CallbackContext, request: &mut LlmRequest);
}

/// Hook invoked after the model answered
#[async_trait]
pub trait AfterModelCallback: Send + Sync {
    /// Inspect and possibly rewrite the response
    async fn after_model(&self, context: &mut CallbackContext, response: LlmResponse)
    -> LlmResponse;
}

/// Hooks selected for one agent role
#[derive(Clone)]
pub struct RoleHooks {
    /// Hooks run before the model call, in order
    pub before: Vec<Arc<dyn BeforeModelCallback>>,
    /// Hooks run after the model call, in order
    pub after: Vec<Arc<dyn AfterModelCallback>>,
}

impl RoleHooks {
    /// Builds the standard hooks for a role.
    ///
    /// Every role logs its queries and responses. The role picks the
    /// response normalizer, and only the resume generator gets memory.
    pub fn for_role(
        role: AgentRole,
        store: Option<Arc<dyn ResumeStore>>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Self {
        let normalizer: Arc<dyn AfterModelCallback> = match role {
            AgentRole::Critic => Arc::new(ReferenceAnnotator::new()),
            AgentRole::Reviser => Arc::new(MarkerTruncator::new()),
            AgentRole::ResumeGenerator => Arc::new(MergeAndPersist::new(store.clone())),
        };

        Self {
            before: vec![Arc::new(MemoryInjector::for_role(role, store, sink.clone()))],
            after: vec![normalizer, Arc::new(ResponseLogger::new(sink))],
        }
    }
}

/// Merges all parts into the first one when every part carries text.
///
/// Returns false, leaving the parts untouched, if any part is not text.
pub(crate) fn merge_text_parts(content: &mut Content) -> bool {
    let texts: Option<Vec<&str>> = content
        .parts
        .iter()
        .map(|part| part.text.as_deref())
        .collect();
    let Some(texts) = texts else {
        return false;
    };

    let merged = texts.join("\n");
    content.parts.truncate(1);
    if let Some(first) = content.parts.first_mut() {
        first.text = Some(merged);
    }
    true
}
