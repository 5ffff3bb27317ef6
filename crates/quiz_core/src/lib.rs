//! # Quiz Core
//!
//! Domain core for the SMS/voice quiz service: the exam registry and the
//! per-participant session state machine, built over an injected key-value
//! store and a write-only results sink. Transport concerns (webhooks, TwiML,
//! telephony REST) live in the sibling crates.

pub mod engine;
pub mod error;
pub mod registry;
pub mod sink;
pub mod storage;
pub mod structs;

// Re-exports
pub use engine::{EngineConfig, PromptDirective, SessionEngine};
pub use error::{QuizError, Result};
pub use registry::ExamRegistry;
pub use sink::ResultsSink;
pub use storage::{KeyValueStore, MemoryStore};
pub use structs::{AnswerRecord, Exam, Registration, Reply, Session, SessionState};
