//! Reqwest client for the quiz results API

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;

use quiz_core::{AnswerRecord, QuizError, Registration, ResultsSink};

/// Forwards registrants and answers to the results API as form posts.
///
/// Both calls are write-only; the engine treats a failure as logged data
/// loss, so no retries happen here.
pub struct HttpResultsSink {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct StudentForm<'a> {
    username: &'a str,
    identifier: &'a str,
    quiz_id: &'a str,
}

#[derive(Serialize)]
struct AnswerForm<'a> {
    student_identifier: &'a str,
    quiz_id: &'a str,
    question: &'a str,
    selection: &'a str,
    timestamp: i64,
}

impl HttpResultsSink {
    /// `base_url` is expected to carry its trailing slash, e.g.
    /// `http://results.internal/api/`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> quiz_core::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuizError::UpstreamUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn post_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> quiz_core::Result<()> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| QuizError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuizError::UpstreamUnavailable(format!(
                "{url} returned {status}"
            )));
        }
        debug!("forwarded record to {url}");
        Ok(())
    }
}

#[async_trait]
impl ResultsSink for HttpResultsSink {
    async fn register_student(&self, registration: &Registration) -> quiz_core::Result<()> {
        self.post_form(
            "students",
            &StudentForm {
                username: &registration.name,
                identifier: &registration.address,
                quiz_id: &registration.exam_id,
            },
        )
        .await
    }

    async fn submit_answer(&self, answer: &AnswerRecord) -> quiz_core::Result<()> {
        self.post_form(
            "answers",
            &AnswerForm {
                student_identifier: &answer.address,
                quiz_id: &answer.exam_id,
                question: &answer.question_id,
                selection: &answer.selection,
                timestamp: answer.timestamp.timestamp(),
            },
        )
        .await
    }
}
