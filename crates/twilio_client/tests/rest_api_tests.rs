//! Integration tests for the Twilio REST client against a mock server

use std::time::Duration;

use twilio_client::{TwilioApi, TwilioClient, TwilioConfig, TwilioError};
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TwilioClient {
    TwilioClient::new(
        TwilioConfig::new("AC_test", "secret", "+15005550006")
            .with_api_base(server.uri())
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_send_message_posts_form_and_returns_sid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC_test/Messages.json"))
        .and(header_exists("authorization"))
        .and(body_string_contains("To=%2B1555"))
        .and(body_string_contains("From=%2B15005550006"))
        .and(body_string_contains("Body=Hi+there%21"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "SM123" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let sid = client.send_message("+1555", "Hi there!").await.unwrap();
    assert_eq!(sid, "SM123");
}

#[tokio::test]
async fn test_place_call_posts_twiml_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC_test/Calls.json"))
        .and(body_string_contains("To=%2B1555"))
        .and(body_string_contains("Url=http"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "CA123" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let sid = client
        .place_call("+1555", "http://example.com/voice.xml")
        .await
        .unwrap();
    assert_eq!(sid, "CA123");
}

#[tokio::test]
async fn test_get_message_parses_creation_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2010-04-01/Accounts/AC_test/Messages/SM123.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sid": "SM123",
            "date_created": "Tue, 15 Aug 2023 20:20:00 +0000"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client.get_message("SM123").await.unwrap();
    assert_eq!(record.sid, "SM123");
    assert_eq!(record.date_created.timestamp(), 1_692_130_800);
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC_test/Messages.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("authentication failed"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.send_message("+1555", "hello").await.unwrap_err();
    match err {
        TwilioError::Api { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("authentication failed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
