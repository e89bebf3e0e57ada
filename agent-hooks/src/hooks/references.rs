//! After-model hook for the critic: renders grounding citations as a
//! markdown reference list appended to the answer.

use super::{AfterModelCallback, merge_text_parts};
use crate::types::{CallbackContext, GroundingChunk, LlmResponse, Part};
use async_trait::async_trait;

/// Opens the appended reference block.
pub const REFERENCE_HEADER: &str = "\n\nReference:\n\n";

/// Appends the response's grounding references and merges the output
/// into a single text part.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceAnnotator;

impl ReferenceAnnotator {
    /// Creates the hook.
    pub fn new() -> Self {
        Self
    }
}

/// Renders one chunk as a bullet line, if it carries a title or text.
fn reference_line(chunk: &GroundingChunk) -> Option<String> {
    let (title, uri, text) = if let Some(ctx) = &chunk.retrieved_context {
        (ctx.title.as_deref(), ctx.uri.as_deref(), ctx.text.as_deref())
    } else if let Some(web) = &chunk.web {
        (web.title.as_deref(), web.uri.as_deref(), None)
    } else {
        return None;
    };

    let mut fields: Vec<String> = [title, text]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() {
        return None;
    }
    if let Some(uri) = uri.filter(|u| !u.is_empty()) {
        fields[0] = format!("[{}]({uri})", fields[0]);
    }
    Some(format!("* {}\n", fields.join(": ")))
}

/// Renders the reference block for a set of chunks.
///
/// Returns `None` when no chunk produced a line.
pub fn render_references(chunks: &[GroundingChunk]) -> Option<String> {
    let lines: Vec<String> = chunks.iter().filter_map(reference_line).collect();
    if lines.is_empty() {
        None
    } else {
        Some(format!("{REFERENCE_HEADER}{}", lines.concat()))
    }
}

#[async_trait]
impl AfterModelCallback for ReferenceAnnotator {
    async fn after_model(
        &self,
        _context: &mut CallbackContext,
        mut response: LlmResponse,
    ) -> LlmResponse {
        let Some(metadata) = response.grounding_metadata.as_ref() else {
            return response;
        };
        let references = render_references(&metadata.grounding_chunks);

        let Some(content) = response.content.as_mut() else {
            return response;
        };
        if content.parts.is_empty() {
            return response;
        }

        if let Some(references) = references {
            content.parts.push(Part::text(references));
        }
        merge_text_parts(content);
        response
    }
}
