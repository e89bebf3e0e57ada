//! Model backend abstractions
//!
//! This module defines the ModelBackend trait and its implementations for
//! talking to a language model.

use crate::{
    errors::Result,
    types::{LlmRequest, LlmResponse},
};
use async_trait::async_trait;

pub mod mock;

#[cfg(feature = "gemini")]
pub mod gemini;

pub use mock::ScriptedModel;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiModel};

/// A language model that turns a request into a single response
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Generate one response for the request
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse>;
}
