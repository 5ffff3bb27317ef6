//! Forwarding interface for registrants and answers

use async_trait::async_trait;

use crate::error::Result;
use crate::structs::{AnswerRecord, Registration};

/// Write-only forwarding of registration and answer records to the results
/// service.
///
/// Delivery is best-effort: callers are free to log and ignore the returned
/// result, and the session engine does exactly that so a sink outage never
/// stalls a participant.
#[async_trait]
pub trait ResultsSink: Send + Sync {
    /// Announce a new registrant.
    async fn register_student(&self, registration: &Registration) -> Result<()>;

    /// Submit one answered question.
    async fn submit_answer(&self, answer: &AnswerRecord) -> Result<()>;
}
