//! Type definitions for agent requests, responses and callback contexts
//!
//! The message types follow the Gemini `generateContent` wire format
//! (camelCase fields) so the same values can be sent to and parsed from the
//! remote backend without an intermediate representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Role name used for user turns
pub const USER_ROLE: &str = "user";
/// Role name used for model turns
pub const MODEL_ROLE: &str = "model";

/// Structured call descriptor emitted by a model instead of text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// Call arguments
    #[serde(default)]
    pub args: Value,
}

/// One part of a message: either text or a structured call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Function call descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_call: None,
        }
    }

    /// Create a function call part
    pub fn function_call(name: impl Into<String>, args: Value) -> Self {
        Self {
            text: None,
            function_call: Some(FunctionCall {
                name: name.into(),
                args,
            }),
        }
    }

    /// Whether the part carries text (possibly empty)
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }
}

/// A message: a role and an ordered sequence of parts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// "user" or "model"; empty for system instructions
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    /// Message parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user message with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: USER_ROLE.to_string(),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model message from parts
    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: MODEL_ROLE.to_string(),
            parts,
        }
    }

    /// Newline-joined text of all text parts
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Built-in tool made available to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Web search grounding
    GoogleSearch(GoogleSearch),
}

/// Marker for the web search grounding tool (serialized as `{}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GoogleSearch {}

impl Tool {
    /// The web search grounding tool
    pub fn google_search() -> Self {
        Self::GoogleSearch(GoogleSearch {})
    }
}

/// Request sent to a model backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    /// Conversation contents, oldest first
    pub contents: Vec<Content>,
    /// System instruction of the acting agent
    pub system_instruction: Option<String>,
    /// Tools the model may use
    pub tools: Vec<Tool>,
}

impl LlmRequest {
    /// Create a request holding a single user message
    pub fn from_user_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(text)],
            ..Default::default()
        }
    }

    /// Text of the last part of the last message, if any
    pub fn last_text(&self) -> Option<&str> {
        self.contents
            .last()
            .and_then(|content| content.parts.last())
            .and_then(|part| part.text.as_deref())
    }
}

/// Source retrieved from a configured corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrievedContext {
    /// Source title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Source URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Retrieved text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Source found by web search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WebChunk {
    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// One citation attached to a grounded response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    /// Retrieved context, takes precedence over `web`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<RetrievedContext>,
    /// Web search result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebChunk>,
}

impl GroundingChunk {
    /// Chunk pointing at a web page
    pub fn web(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            retrieved_context: None,
            web: Some(WebChunk {
                title: Some(title.into()),
                uri: Some(uri.into()),
            }),
        }
    }
}

/// Citation metadata attached by a search-augmented model call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Citation chunks
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// Response returned by a model backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    /// Response content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Grounding metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

impl LlmResponse {
    /// Create a model response from parts
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            content: Some(Content::model(parts)),
            grounding_metadata: None,
        }
    }

    /// Create a model response with a single text part
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)])
    }

    /// Attach grounding metadata
    pub fn with_grounding(mut self, chunks: Vec<GroundingChunk>) -> Self {
        self.grounding_metadata = Some(GroundingMetadata {
            grounding_chunks: chunks,
        });
        self
    }

    /// Parts of the response, empty when there is no content
    pub fn parts(&self) -> &[Part] {
        self.content
            .as_ref()
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Newline-joined text of all text parts
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(Content::joined_text)
            .unwrap_or_default()
    }
}

/// Which agent a set of hooks is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Verifies statements with web search and cites sources
    Critic,
    /// Corrects inaccuracies found by the critic
    Reviser,
    /// Writes resumes and remembers them per user
    ResumeGenerator,
}

impl AgentRole {
    /// Conventional agent name for the role
    pub fn default_name(&self) -> &'static str {
        match self {
            AgentRole::Critic => "critic_agent",
            AgentRole::Reviser => "reviser_agent",
            AgentRole::ResumeGenerator => "resume_generator_agent",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

/// Session shared by the agents of one run
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Runtime session identifier
    pub id: Option<String>,
    /// Session state, normally a JSON object
    pub state: Option<Value>,
}

impl Session {
    /// Create a session with an id and an empty state object
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            state: Some(Value::Object(Map::new())),
        }
    }

    /// Replace the state
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }

    /// Read a string entry of the state
    pub fn state_str(&self, key: &str) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|state| state.get(key))
            .and_then(Value::as_str)
    }
}

/// Per-call view of the session handed to every hook
#[derive(Debug, Clone)]
pub struct CallbackContext {
    /// Name of the acting agent
    pub agent_name: String,
    /// Role of the acting agent
    pub role: AgentRole,
    /// Session identifier supplied by the runtime
    pub session_id: Option<String>,
    /// Session state; anything other than a JSON object is treated as empty
    pub session_state: Option<Value>,
}

impl CallbackContext {
    /// Create a context for an agent role, named after the role
    pub fn new(role: AgentRole) -> Self {
        Self {
            agent_name: role.default_name().to_string(),
            role,
            session_id: None,
            session_state: None,
        }
    }

    /// Override the agent name
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    /// Set the runtime session id
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the session state
    pub fn with_session_state(mut self, state: Value) -> Self {
        self.session_state = Some(state);
        self
    }

    /// Session state as a mapping, if it is one
    pub fn state_map(&self) -> Option<&Map<String, Value>> {
        self.session_state.as_ref().and_then(Value::as_object)
    }

    /// Mutable session state mapping, if it is one
    pub fn state_map_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.session_state.as_mut().and_then(Value::as_object_mut)
    }
}
