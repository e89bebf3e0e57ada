//! # Resume memory
//!
//! Persistent per-user memory for the resume generator.
//!
//! ## Components
//!
//! - `resolve_persistence_key`: derives whose record to read or write
//! - `looks_like_full_info`: decides whether a message is fresh candidate
//!   information (no injection) or a request about a stored resume
//! - `ResumeStore`: append-only text records keyed by persistence key
//! - `FileResumeStore`: durable one-file-per-key implementation
//! - `InMemoryResumeStore`: volatile implementation for tests

mod file_store;
mod heuristic;
mod identity;
mod store;

pub use file_store::FileResumeStore;
pub use heuristic::{FULL_INFO_MIN_CHARS, RESUME_KEYWORDS, looks_like_full_info};
pub use identity::{DEFAULT_PERSISTENCE_KEY, resolve_persistence_key};
pub use store::{InMemoryResumeStore, RECORD_SEPARATOR, RECORD_SEPARATOR_WIDTH, ResumeStore};
