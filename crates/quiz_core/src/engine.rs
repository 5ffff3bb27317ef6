//! Participant session state machine
//!
//! Consumes inbound (address, text) events and drives each phone number
//! through enrollment, naming, and answering. The same transitions serve both
//! SMS and voice: only the input shape (message body, speech transcript, or
//! keypress digits) and the outbound channel differ.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::error::{QuizError, Result};
use crate::registry::ExamRegistry;
use crate::sink::ResultsSink;
use crate::storage::KeyValueStore;
use crate::structs::{AnswerRecord, Exam, Registration, Reply, Session, SessionState};

const SESSION_KEY_PREFIX: &str = "session:";

/// Time-to-live tuning for participant sessions.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Session expiry, refreshed on every write.
    pub session_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(5 * 60),
        }
    }
}

/// What the next inbound input from an address will mean. Drives the shape of
/// the voice `<Gather>` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDirective {
    /// No session yet: expect a 6-digit exam code.
    EnterExamCode,
    /// Session awaiting the participant's display name.
    SpeakName,
    /// Session mid-exam: expect a single answer selection.
    AnswerDigit,
}

pub struct SessionEngine {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<ExamRegistry>,
    sink: Arc<dyn ResultsSink>,
    config: EngineConfig,
    // One lock per address: events for the same sender (e.g. duplicate SMS
    // delivery) must not interleave the read-modify-write.
    address_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        registry: Arc<ExamRegistry>,
        sink: Arc<dyn ResultsSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            registry,
            sink,
            config,
            address_locks: DashMap::new(),
        }
    }

    /// Handle one inbound event and return the reply to deliver, if any.
    ///
    /// With no session, `text` is tried as an exam code; in `AwaitingName` it
    /// is the display name; in `Answering` it answers the current question.
    pub async fn handle_inbound_event(
        &self,
        address: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Reply>> {
        let lock = self.lock_for(address);
        let _guard = lock.lock().await;

        let session = match self.load_session(address).await? {
            None => return self.try_enroll(address, text).await,
            Some(session) => session,
        };

        let exam = match self.registry.lookup_exam(&session.exam_code).await {
            Ok(exam) => exam,
            Err(QuizError::NotFound) => {
                // Exam expired mid-session: drop the orphaned session.
                warn!(
                    "{address} holds a session for expired exam code {}",
                    session.exam_code
                );
                self.delete_session(address).await?;
                return Ok(Some(Reply::ExamUnavailable));
            }
            Err(e) => return Err(e),
        };

        match session.state {
            SessionState::AwaitingName => self.record_name(address, session, exam, text).await,
            SessionState::Answering => {
                self.record_answer(address, session, exam, text, timestamp).await
            }
        }
    }

    /// Report what the next inbound input from this address will mean.
    pub async fn prompt_for(&self, address: &str) -> Result<PromptDirective> {
        Ok(match self.load_session(address).await? {
            None => PromptDirective::EnterExamCode,
            Some(session) => match session.state {
                SessionState::AwaitingName => PromptDirective::SpeakName,
                SessionState::Answering => PromptDirective::AnswerDigit,
            },
        })
    }

    /// No session: enroll if `text` is a live exam code, otherwise stay
    /// silent so arbitrary inbound noise draws no response.
    async fn try_enroll(&self, address: &str, text: &str) -> Result<Option<Reply>> {
        if !self.registry.code_is_live(text).await? {
            debug!("ignoring message from {address}: no session, text is not a live code");
            return Ok(None);
        }

        let session = Session::new(text);
        self.save_session(address, &session).await?;
        info!("{address} enrolled in exam code {text}");
        Ok(Some(Reply::Registered))
    }

    async fn record_name(
        &self,
        address: &str,
        mut session: Session,
        exam: Exam,
        text: &str,
    ) -> Result<Option<Reply>> {
        session.state = SessionState::Answering;
        session.question_index = 0;
        session.name = Some(text.to_string());
        self.save_session(address, &session).await?;

        let registration = Registration {
            name: text.to_string(),
            address: address.to_string(),
            exam_id: exam.exam_id,
        };
        // Best-effort forwarding: a sink outage must not roll back the
        // transition or stall the participant.
        if let Err(e) = self.sink.register_student(&registration).await {
            warn!("failed to forward registration for {address}: {e}");
        }

        info!("{address} participates as {}", registration.name);
        Ok(Some(Reply::NameRecorded {
            name: registration.name,
        }))
    }

    async fn record_answer(
        &self,
        address: &str,
        mut session: Session,
        exam: Exam,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Reply>> {
        let question_id = match exam.question_at(session.question_index) {
            Some(id) => id.to_string(),
            None => {
                // Exam data does not cover this index; treat it like an
                // expired exam rather than leaving a stuck session behind.
                warn!(
                    "exam {} has no question at index {}",
                    exam.exam_id, session.question_index
                );
                self.delete_session(address).await?;
                return Ok(Some(Reply::ExamUnavailable));
            }
        };

        let answer = AnswerRecord {
            address: address.to_string(),
            exam_id: exam.exam_id.clone(),
            question_id,
            selection: text.to_string(),
            timestamp,
        };

        session.question_index += 1;
        if session.question_index >= exam.num_questions {
            // Exam complete for this participant; no terminal record is kept.
            self.delete_session(address).await?;
            info!("{address} completed exam {}", exam.exam_id);
        } else {
            self.save_session(address, &session).await?;
            debug!(
                "{address} advanced to question {} of {}",
                session.question_index, exam.num_questions
            );
        }

        if let Err(e) = self.sink.submit_answer(&answer).await {
            warn!("failed to forward answer from {address}: {e}");
        }

        Ok(None)
    }

    fn lock_for(&self, address: &str) -> Arc<Mutex<()>> {
        self.address_locks
            .entry(address.to_string())
            .or_default()
            .clone()
    }

    async fn load_session(&self, address: &str) -> Result<Option<Session>> {
        match self.store.get(&session_key(address)).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn save_session(&self, address: &str, session: &Session) -> Result<()> {
        let payload = serde_json::to_string(session)?;
        self.store
            .set(&session_key(address), &payload, self.config.session_ttl)
            .await
    }

    async fn delete_session(&self, address: &str) -> Result<()> {
        self.store.delete(&session_key(address)).await
    }
}

fn session_key(address: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{address}")
}
