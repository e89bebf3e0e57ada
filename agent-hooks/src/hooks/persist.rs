//! After-model hook for the resume generator: merges the generated
//! resume into one block and persists it for the user.

use super::{AfterModelCallback, merge_text_parts};
use crate::memory::{ResumeStore, resolve_persistence_key};
use crate::types::{CallbackContext, LlmResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Session state key receiving the latest generated resume.
pub const PREVIOUS_RESUME_KEY: &str = "previous_resume";

/// Merges the response into a single text block, keeps it in the session
/// state, appends it to the user's stored record and strips citations.
pub struct MergeAndPersist {
    store: Option<Arc<dyn ResumeStore>>,
}

impl MergeAndPersist {
    /// Creates the hook; without an available store nothing is persisted.
    pub fn new(store: Option<Arc<dyn ResumeStore>>) -> Self {
        Self {
            store: store.filter(|store| store.is_available()),
        }
    }

    async fn persist(&self, context: &CallbackContext, text: &str) {
        let Some(store) = &self.store else {
            return;
        };
        let key = resolve_persistence_key(context);
        match store.save(&key, text).await {
            Ok(()) => debug!(key = %key, "Persisted generated resume"),
            Err(e) => warn!(key = %key, error = %e, "Failed to persist generated resume"),
        }
    }
}

#[async_trait]
impl AfterModelCallback for MergeAndPersist {
    async fn after_model(
        &self,
        context: &mut CallbackContext,
        mut response: LlmResponse,
    ) -> LlmResponse {
        let Some(content) = response.content.as_mut() else {
            return response;
        };
        if content.parts.is_empty() {
            return response;
        }

        let merged = if merge_text_parts(content) {
            content.parts[0].text.clone().unwrap_or_default()
        } else {
            content.joined_text()
        };

        if let Some(state) = context.state_map_mut() {
            state.insert(PREVIOUS_RESUME_KEY.to_string(), Value::String(merged.clone()));
        }

        self.persist(context, &merged).await;

        response.grounding_metadata = None;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryResumeStore;
    use crate::types::{AgentRole, GroundingChunk, Part};
    use serde_json::json;

    fn hook(store: Arc<InMemoryResumeStore>) -> MergeAndPersist {
        MergeAndPersist::new(Some(store as Arc<dyn ResumeStore>))
    }

    #[tokio::test]
    async fn test_merges_stashes_and_persists() {
        let store = Arc::new(InMemoryResumeStore::new());
        let mut ctx = CallbackContext::new(AgentRole::ResumeGenerator)
            .with_session_state(json!({"user_id": "u1"}));
        let response = LlmResponse::from_parts(vec![Part::text("# Jane Doe"), Part::text("Engineer")])
            .with_grounding(vec![GroundingChunk::web("x", "http://x")]);

        let result = hook(store.clone()).after_model(&mut ctx, response).await;

        assert_eq!(result.parts(), &[Part::text("# Jane Doe\nEngineer")]);
        assert!(result.grounding_metadata.is_none());
        assert_eq!(
            ctx.state_map().unwrap()[PREVIOUS_RESUME_KEY],
            json!("# Jane Doe\nEngineer")
        );
        assert_eq!(store.load("u1").await.unwrap(), "# Jane Doe\nEngineer");
    }

    #[tokio::test]
    async fn test_without_state_uses_fallback_key() {
        let store = Arc::new(InMemoryResumeStore::new());
        let mut ctx = CallbackContext::new(AgentRole::ResumeGenerator);

        hook(store.clone())
            .after_model(&mut ctx, LlmResponse::from_text("resume"))
            .await;

        assert!(ctx.session_state.is_none());
        assert_eq!(store.load("default").await.unwrap(), "resume");
    }

    #[tokio::test]
    async fn test_function_call_keeps_parts_persists_text() {
        let store = Arc::new(InMemoryResumeStore::new());
        let mut ctx = CallbackContext::new(AgentRole::ResumeGenerator).with_session_id("s9");
        let response = LlmResponse::from_parts(vec![
            Part::text("partial"),
            Part::function_call("format", serde_json::Value::Null),
        ]);

        let result = hook(store.clone()).after_model(&mut ctx, response).await;

        assert_eq!(result.parts().len(), 2);
        assert_eq!(store.load("s9").await.unwrap(), "partial");
    }

    #[tokio::test]
    async fn test_no_store_still_normalizes() {
        let mut ctx = CallbackContext::new(AgentRole::ResumeGenerator)
            .with_session_state(json!({}));
        let response = LlmResponse::from_parts(vec![Part::text("a"), Part::text("b")])
            .with_grounding(vec![]);

        let result = MergeAndPersist::new(None).after_model(&mut ctx, response).await;

        assert_eq!(result.parts(), &[Part::text("a\nb")]);
        assert!(result.grounding_metadata.is_none());
        assert_eq!(ctx.state_map().unwrap()[PREVIOUS_RESUME_KEY], json!("a\nb"));
    }

    #[tokio::test]
    async fn test_empty_output_still_appended() {
        let store = Arc::new(InMemoryResumeStore::with_record("u1", "A"));
        let mut ctx = CallbackContext::new(AgentRole::ResumeGenerator)
            .with_session_state(json!({"user_id": "u1"}));

        hook(store.clone())
            .after_model(&mut ctx, LlmResponse::from_parts(vec![Part::text("")]))
            .await;

        let expected = format!("A\n\n{}\n\n", "-".repeat(40));
        assert_eq!(store.load("u1").await.unwrap(), expected);
        assert_eq!(ctx.state_map().unwrap()[PREVIOUS_RESUME_KEY], json!(""));
    }

    #[tokio::test]
    async fn test_missing_content_unchanged() {
        let store = Arc::new(InMemoryResumeStore::new());
        let mut ctx = CallbackContext::new(AgentRole::ResumeGenerator);
        let response = LlmResponse::default().with_grounding(vec![]);

        let result = hook(store.clone()).after_model(&mut ctx, response.clone()).await;

        assert_eq!(result, response);
        assert!(store.is_empty());
    }
}
