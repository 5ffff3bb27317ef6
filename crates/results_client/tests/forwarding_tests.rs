//! Integration tests for the results API client

use std::time::Duration;

use chrono::{TimeZone, Utc};
use quiz_core::{AnswerRecord, QuizError, Registration, ResultsSink};
use results_client::HttpResultsSink;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sink_for(server: &MockServer) -> HttpResultsSink {
    HttpResultsSink::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_register_student_posts_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/students"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=Alice"))
        .and(body_string_contains("identifier=%2B1555"))
        .and(body_string_contains("quiz_id=e1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = sink_for(&mock_server);
    let registration = Registration {
        name: "Alice".to_string(),
        address: "+1555".to_string(),
        exam_id: "e1".to_string(),
    };

    sink.register_student(&registration).await.unwrap();
}

#[tokio::test]
async fn test_submit_answer_posts_form_with_epoch_timestamp() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/answers"))
        .and(body_string_contains("student_identifier=%2B1555"))
        .and(body_string_contains("quiz_id=e1"))
        .and(body_string_contains("question=q1"))
        .and(body_string_contains("selection=A"))
        .and(body_string_contains("timestamp=1700000000"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = sink_for(&mock_server);
    let answer = AnswerRecord {
        address: "+1555".to_string(),
        exam_id: "e1".to_string(),
        question_id: "q1".to_string(),
        selection: "A".to_string(),
        timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    };

    sink.submit_answer(&answer).await.unwrap();
}

#[tokio::test]
async fn test_server_error_surfaces_as_upstream_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let sink = sink_for(&mock_server);
    let registration = Registration {
        name: "Alice".to_string(),
        address: "+1555".to_string(),
        exam_id: "e1".to_string(),
    };

    let err = sink.register_student(&registration).await.unwrap_err();
    assert!(matches!(err, QuizError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_unreachable_server_surfaces_as_upstream_unavailable() {
    // Nothing listens on this port.
    let sink = HttpResultsSink::new("http://127.0.0.1:9/", Duration::from_secs(1)).unwrap();
    let answer = AnswerRecord {
        address: "+1555".to_string(),
        exam_id: "e1".to_string(),
        question_id: "q1".to_string(),
        selection: "A".to_string(),
        timestamp: Utc::now(),
    };

    let err = sink.submit_answer(&answer).await.unwrap_err();
    assert!(matches!(err, QuizError::UpstreamUnavailable(_)));
}
