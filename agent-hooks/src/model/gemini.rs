//! Gemini `generateContent` backend
//!
//! Sends the request over HTTPS and maps the first candidate (content and
//! grounding metadata) back into an [`LlmResponse`].

use super::ModelBackend;
use crate::{
    errors::{HookError, Result},
    types::{Content, GroundingMetadata, LlmRequest, LlmResponse, Part, Tool},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Public Gemini API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for [`GeminiModel`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Model name, e.g. `gemini-2.0-flash`
    pub model: String,
    /// API key
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Settings for the public endpoint
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Use another base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use another request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [Tool],
}

fn no_tools(tools: &&[Tool]) -> bool {
    tools.is_empty()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

/// Model backend calling the Gemini REST API
pub struct GeminiModel {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiModel {
    /// Create a backend; fails if the API key is empty
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(HookError::Config("Gemini API key is not set".to_string()));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn body<'a>(request: &'a LlmRequest) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: &request.contents,
            system_instruction: request
                .system_instruction
                .as_ref()
                .map(|instruction| Content {
                    role: String::new(),
                    parts: vec![Part::text(instruction.clone())],
                }),
            tools: &request.tools,
        }
    }
}

#[async_trait]
impl ModelBackend for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse> {
        debug!(model = %self.config.model, turns = request.contents.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&Self::body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(HookError::model(
                format!("Gemini API error ({status}): {text}"),
                Some(status.as_u16()),
            ));
        }

        let body: GenerateContentResponse = response.json().await?;
        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| HookError::model("No candidates in response", None))?;

        Ok(LlmResponse {
            content: candidate.content,
            grounding_metadata: candidate.grounding_metadata,
        })
    }
}
