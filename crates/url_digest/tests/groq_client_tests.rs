use digest_core::{HeuristicEstimator, Strategy};
use serde_json::json;
use url_digest::{
    groq::{GroqClient, GroqError},
    ChainSummarizer, Completion, PromptSet, Summarizer,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1234567890,
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
    })
}

fn client(server: &MockServer) -> GroqClient {
    GroqClient::new("gsk_test").with_base_url(server.uri())
}

#[tokio::test]
async fn test_completion_sends_user_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "llama-3.3-70b-versatile",
            "messages": [{ "role": "user", "content": "Summarize this" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("A summary.")))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client(&server).complete("Summarize this").await.unwrap();
    assert_eq!(summary, "A summary.");
}

#[tokio::test]
async fn test_rate_limit_is_a_distinct_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_string(r#"{"error":{"message":"Rate limit reached for tokens per minute"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).complete("Summarize this").await.unwrap_err();
    match err {
        GroqError::RateLimited { message } => assert!(message.contains("tokens per minute")),
        other => panic!("expected a rate limit error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client(&server).complete("Summarize this").await.unwrap_err();
    assert!(matches!(err, GroqError::Api { status: 500, ref message } if message == "upstream unavailable"));
}

#[tokio::test]
async fn test_response_without_choices_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-empty",
            "choices": []
        })))
        .mount(&server)
        .await;

    let err = client(&server).complete("Summarize this").await.unwrap_err();
    assert!(matches!(err, GroqError::EmptyResponse));
}

#[tokio::test]
async fn test_refine_chain_makes_one_request_per_chunk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Running summary.")))
        .expect(3)
        .mount(&server)
        .await;

    let summarizer = ChainSummarizer::new(client(&server), HeuristicEstimator);
    let plan = PromptSet::default().plan(Strategy::SequentialRefine);
    let summary = summarizer
        .summarize(&["first chunk", "second chunk", "third chunk"], &plan)
        .await
        .unwrap();

    assert_eq!(summary, "Running summary.");
}
