//! Persistence key resolution.
//!
//! Resumes are stored per logical user. The key is taken from the first
//! non-empty source in this order:
//! 1. `session_state["user_id"]`
//! 2. `session_state["session_id"]`
//! 3. the runtime session id of the callback context
//! 4. the literal [`DEFAULT_PERSISTENCE_KEY`]

use crate::types::CallbackContext;
use serde_json::Value;

/// Key used when the context carries no identity at all.
pub const DEFAULT_PERSISTENCE_KEY: &str = "default";

/// State keys consulted for an identity, highest priority first.
const IDENTITY_STATE_KEYS: [&str; 2] = ["user_id", "session_id"];

/// Resolves the persistence key for a callback context.
///
/// Never fails and never returns an empty string.
pub fn resolve_persistence_key(context: &CallbackContext) -> String {
    let from_state = context.state_map().and_then(|state| {
        IDENTITY_STATE_KEYS
            .iter()
            .find_map(|key| state.get(*key).and_then(identity_value))
    });

    from_state
        .or_else(|| {
            context
                .session_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_PERSISTENCE_KEY.to_string())
}

/// Renders a state value as an identity; strings and numbers only.
fn identity_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
