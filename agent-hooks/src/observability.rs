//! Traffic observability for agent hooks
//!
//! Hooks receive an [`ObservabilitySink`] at construction time instead of
//! relying on a process-wide logger, so tests can capture exactly what a
//! hook emitted.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use tracing::info;

/// One observed piece of agent traffic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrafficEvent {
    /// Text about to be sent to a model
    Query {
        /// Acting agent
        agent: String,
        /// Final outgoing text
        text: String,
    },
    /// Text part of a model response
    Response {
        /// Acting agent
        agent: String,
        /// Response text
        text: String,
    },
    /// Function call part of a model response
    FunctionCall {
        /// Acting agent
        agent: String,
        /// Called function
        name: String,
    },
}

impl TrafficEvent {
    /// Name of the agent the event belongs to
    pub fn agent(&self) -> &str {
        match self {
            TrafficEvent::Query { agent, .. }
            | TrafficEvent::Response { agent, .. }
            | TrafficEvent::FunctionCall { agent, .. } => agent,
        }
    }
}

impl fmt::Display for TrafficEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficEvent::Query { agent, text } => write!(f, "[query to {agent}]: {text}"),
            TrafficEvent::Response { agent, text } => {
                write!(f, "[response from {agent}]: {text}")
            },
            TrafficEvent::FunctionCall { agent, name } => {
                write!(f, "[function call from {agent}]: {name}")
            },
        }
    }
}

/// Destination for traffic events
pub trait ObservabilitySink: Send + Sync {
    /// Record one event
    fn record(&self, event: TrafficEvent);
}

/// Sink forwarding events to `tracing` under the `agent_hooks::traffic` target
///
/// Timestamps and the final destination (console, file) are decided by the
/// subscriber installed by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn record(&self, event: TrafficEvent) {
        info!(target: "agent_hooks::traffic", agent = event.agent(), "{event}");
    }
}

/// Captured event with the time it was recorded
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
    /// The event
    pub event: TrafficEvent,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [INFO] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.event
        )
    }
}

/// Sink keeping every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<TrafficEvent> {
        self.records
            .lock()
            .iter()
            .map(|record| record.event.clone())
            .collect()
    }

    /// All records with timestamps, oldest first
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Rendered log lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.records.lock().iter().map(ToString::to_string).collect()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl ObservabilitySink for MemorySink {
    fn record(&self, event: TrafficEvent) {
        self.records.lock().push(LogRecord {
            timestamp: Utc::now(),
            event,
        });
    }
}
