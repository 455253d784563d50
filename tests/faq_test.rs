use std::sync::Arc;
use std::time::Duration;

use hackathon_portal::faq::{AnswerSource, FaqService, OpenAiClient, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn faq_with_model(server: &MockServer) -> FaqService {
    let client = OpenAiClient::new(
        format!("{}/v1/", server.uri()),
        "sk-test",
        "gpt-4o-mini",
        Duration::from_millis(500),
    )
    .unwrap();
    let generator: Arc<dyn TextGenerator> = Arc::new(client);
    FaqService::new(Some(generator))
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

#[tokio::test]
async fn model_reply_is_used_when_available() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini", "temperature": 0.2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Teams have two members.\n")))
        .expect(1)
        .mount(&server)
        .await;

    let faq = faq_with_model(&server);
    let reply = faq.ask(None, "How big is a team?").await.unwrap();

    assert_eq!(reply.answer, "Teams have two members.");
    assert_eq!(reply.source, AnswerSource::Model);
}

#[tokio::test]
async fn conversation_history_is_sent_to_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Sure.")))
        .expect(2)
        .mount(&server)
        .await;

    let faq = faq_with_model(&server);
    let first = faq.ask(None, "Who can join?").await.unwrap();
    faq.ask(Some(first.conversation_id), "And the deadline?")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = last["messages"].as_array().unwrap();

    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages.last().unwrap()["content"], "And the deadline?");
    // system + greeting + two user turns + one assistant reply
    assert_eq!(messages.len(), 5);
}

#[tokio::test]
async fn upstream_failure_falls_back_to_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let faq = faq_with_model(&server);
    let reply = faq.ask(None, "What is the team size?").await.unwrap();

    assert_eq!(reply.answer, "Team size is fixed to 2 members.");
    assert_eq!(reply.source, AnswerSource::Fallback);
}

#[tokio::test]
async fn empty_choices_fall_back_to_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let faq = faq_with_model(&server);
    let reply = faq.ask(None, "How do I register?").await.unwrap();

    assert!(reply.answer.starts_with("Registration steps"));
    assert_eq!(reply.source, AnswerSource::Fallback);
}

#[tokio::test]
async fn slow_model_falls_back_to_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let faq = faq_with_model(&server);
    let reply = faq.ask(None, "Who is eligible?").await.unwrap();

    assert!(reply.answer.starts_with("Eligibility"));
    assert_eq!(reply.source, AnswerSource::Fallback);
}
