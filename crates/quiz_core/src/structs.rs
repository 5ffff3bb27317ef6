//! Exam and session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered exam, stored under its generated 6-digit code.
///
/// Read-only after creation; it disappears when its time-to-live elapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    /// Identifier of the exam in the results service.
    pub exam_id: String,

    /// Number of answers expected from each participant.
    pub num_questions: usize,

    /// Ordered question identifiers, forwarded alongside each answer.
    pub questions: Vec<String>,
}

impl Exam {
    /// Question identifier at the given position, if the exam data covers it.
    pub fn question_at(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }
}

/// Lifecycle state of a participant session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Enrolled with a code; the next message carries the display name.
    AwaitingName,
    /// Registered; every further message answers the current question.
    Answering,
}

/// Per-participant progress through one exam. Store key is the sender address,
/// so at most one session exists per phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Code of the exam this participant enrolled in.
    pub exam_code: String,

    pub state: SessionState,

    /// Index of the question the next answer belongs to. Never decreases and
    /// never exceeds the exam's question count.
    pub question_index: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Session {
    /// Fresh session for an address that just sent a live exam code.
    pub fn new(exam_code: impl Into<String>) -> Self {
        Self {
            exam_code: exam_code.into(),
            state: SessionState::AwaitingName,
            question_index: 0,
            name: None,
        }
    }
}

/// New registrant forwarded to the results service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub address: String,
    pub exam_id: String,
}

/// One answered question forwarded to the results service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub address: String,
    pub exam_id: String,
    pub question_id: String,
    pub selection: String,
    pub timestamp: DateTime<Utc>,
}

/// Outbound notification the transport delivers back over the channel the
/// inbound event arrived on (reply message or spoken prompt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Enrollment succeeded; the participant should now send a name.
    Registered,
    /// Name recorded; the participant is in the exam.
    NameRecorded { name: String },
    /// The exam expired before the participant finished.
    ExamUnavailable,
}

impl Reply {
    /// Text rendering shared by the SMS and voice channels.
    pub fn text(&self) -> String {
        match self {
            Reply::Registered => {
                "You are registered for the quiz. Now reply with your name.".to_string()
            }
            Reply::NameRecorded { name } => {
                format!("Thanks {name}, you are in. Answer each question as it arrives.")
            }
            Reply::ExamUnavailable => "This quiz is no longer available.".to_string(),
        }
    }
}
