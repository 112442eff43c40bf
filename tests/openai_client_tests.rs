use localmind::{
    config::{LlmConfig, Provider},
    llm::{GenerativeModel, OpenAiClient, PromptPayload},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const COMPLETIONS_PATH: &str = "/chat/completions";

fn make_client(server: &MockServer, timeout_secs: u64) -> OpenAiClient {
    let config = LlmConfig {
        provider: Provider::OpenAi,
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        model: "llava".to_string(),
        timeout_secs,
    };
    OpenAiClient::new(&config, "test-key").unwrap()
}

#[tokio::test]
async fn test_generate_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "llava",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Charminar" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = make_client(&server, 5)
        .generate(&PromptPayload::text("Famous monument in Hyderabad?"))
        .await
        .unwrap();

    assert_eq!(response.text, "Charminar");
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = make_client(&server, 1);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.generate(&PromptPayload::text("hi")),
    )
    .await
    .expect("generate kept retrying");

    assert!(result.is_err());
    // `expect(1)` is verified when the server drops.
}

#[tokio::test]
async fn test_slow_endpoint_hits_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = make_client(&server, 1);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.generate(&PromptPayload::text("hi")),
    )
    .await
    .expect("request outlived the configured timeout");

    assert!(result.is_err());
}
