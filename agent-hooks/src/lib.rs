//! # Agent Hooks
//!
//! Model-call hooks for a small family of LLM agents, with persistent
//! per-user resume memory.
//!
//! ## Features
//!
//! - **Critic / reviser auditor**: a two-agent pipeline that fact checks an
//!   answer with web search, then rewrites it
//! - **Resume generator**: writes resumes and remembers them per user across
//!   sessions
//! - **Hooks**: before/after model callbacks with fixed ordering
//! - **Observability**: every query, response and function call is logged
//! - **Pluggable backends**: Gemini over HTTPS, or a scripted model for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_hooks::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let model = Arc::new(ScriptedModel::always("Looks accurate."));
//!     let auditor = llm_auditor(model, Arc::new(TracingSink));
//!
//!     let mut session = Session::new("demo");
//!     let answer = auditor.run(&mut session, "Q: Is the sky blue?\nA: Yes.").await?;
//!     println!("{}", answer.text());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod agent;
mod errors;
pub mod hooks;
/// Persistent resume memory
pub mod memory;
pub mod model;
pub mod observability;
mod pipeline;
pub mod prompts;
mod runner;
mod types;

pub use agent::{AgentBuilder, LlmAgent, critic_agent, resume_generator_agent, reviser_agent};
pub use errors::{HookError, Result};
pub use hooks::{AfterModelCallback, BeforeModelCallback, RoleHooks};
pub use memory::{FileResumeStore, InMemoryResumeStore, ResumeStore};
pub use model::{ModelBackend, ScriptedModel};
#[cfg(feature = "gemini")]
pub use model::{GeminiConfig, GeminiModel};
pub use observability::{MemorySink, ObservabilitySink, TracingSink, TrafficEvent};
pub use pipeline::{SequentialPipeline, llm_auditor};
pub use runner::ResumeRunner;
pub use types::{
    AgentRole, CallbackContext, Content, FunctionCall, GoogleSearch, GroundingChunk,
    GroundingMetadata, LlmRequest, LlmResponse, MODEL_ROLE, Part, RetrievedContext, Session,
    Tool, USER_ROLE, WebChunk,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AgentRole, FileResumeStore, HookError, LlmAgent, LlmRequest, LlmResponse, ModelBackend,
        ResumeRunner, ResumeStore, Result, ScriptedModel, SequentialPipeline, Session,
        TracingSink, llm_auditor,
    };
}
