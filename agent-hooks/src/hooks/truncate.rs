//! After-model hook for the reviser: drops everything after the
//! end-of-edit marker.

use super::AfterModelCallback;
use crate::types::{CallbackContext, LlmResponse};
use async_trait::async_trait;

/// Marker the reviser emits after the corrected text.
pub const END_OF_EDIT_MARK: &str = "---END-OF-EDIT---";

/// Truncates the response at the first end-of-edit marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerTruncator;

impl MarkerTruncator {
    /// Creates the hook.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AfterModelCallback for MarkerTruncator {
    async fn after_model(
        &self,
        _context: &mut CallbackContext,
        mut response: LlmResponse,
    ) -> LlmResponse {
        let Some(content) = response.content.as_mut() else {
            return response;
        };

        let marked = content.parts.iter().enumerate().find_map(|(idx, part)| {
            part.text
                .as_deref()
                .and_then(|text| text.find(END_OF_EDIT_MARK))
                .map(|offset| (idx, offset))
        });

        if let Some((idx, offset)) = marked {
            content.parts.truncate(idx + 1);
            if let Some(text) = content.parts[idx].text.as_mut() {
                text.truncate(offset);
            }
        }
        response
    }
}
