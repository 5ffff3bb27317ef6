use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Provider-side record of a message, fetched for its creation time.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub sid: String,
    pub date_created: DateTime<Utc>,
}

#[async_trait]
pub trait TwilioApi: Send + Sync {
    /// Send an SMS and return the provider message sid.
    async fn send_message(&self, to: &str, body: &str) -> Result<String>;

    /// Place an outbound call that fetches its instructions from `twiml_url`.
    async fn place_call(&self, to: &str, twiml_url: &str) -> Result<String>;

    /// Fetch the provider record of a previously handled message.
    async fn get_message(&self, sid: &str) -> Result<MessageRecord>;
}
