//! Reqwest client for the Twilio REST API

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::client_trait::{MessageRecord, TwilioApi};
use crate::error::{Result, TwilioError};

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Credentials and endpoint settings for the REST client.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Number outbound messages and calls originate from.
    pub from_number: String,
    /// Overridable for tests against a local mock server.
    pub api_base: String,
    pub timeout: Duration,
}

impl TwilioConfig {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct TwilioClient {
    config: TwilioConfig,
    client: Client,
}

#[derive(Deserialize)]
struct SidResponse {
    sid: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    sid: String,
    // Twilio reports timestamps in RFC 2822, e.g.
    // "Tue, 15 Aug 2023 20:20:00 +0000".
    date_created: String,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn account_url(&self, resource: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{}",
            self.config.api_base, self.config.account_sid, resource
        )
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TwilioError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn post_resource(&self, resource: &str, form: &[(&str, &str)]) -> Result<String> {
        let url = self.account_url(resource);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(form)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body: SidResponse = serde_json::from_slice(&response.bytes().await?)?;
        debug!("created {resource} resource {}", body.sid);
        Ok(body.sid)
    }
}

#[async_trait]
impl TwilioApi for TwilioClient {
    async fn send_message(&self, to: &str, body: &str) -> Result<String> {
        self.post_resource(
            "Messages.json",
            &[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ],
        )
        .await
    }

    async fn place_call(&self, to: &str, twiml_url: &str) -> Result<String> {
        self.post_resource(
            "Calls.json",
            &[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Url", twiml_url),
            ],
        )
        .await
    }

    async fn get_message(&self, sid: &str) -> Result<MessageRecord> {
        let url = self.account_url(&format!("Messages/{sid}.json"));
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body: MessageResponse = serde_json::from_slice(&response.bytes().await?)?;
        let date_created: DateTime<Utc> =
            DateTime::parse_from_rfc2822(&body.date_created)?.with_timezone(&Utc);
        Ok(MessageRecord {
            sid: body.sid,
            date_created,
        })
    }
}
