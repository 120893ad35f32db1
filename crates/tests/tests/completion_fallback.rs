use std::time::Duration;

use chronos_agents::{
    ChatResponder, CompletionBackend, CompletionConfig, CompletionError, OpenAiCompletion,
    ReplySource,
};
use chronos_core::{rule_based_reply, ConversationHistory, Role};
use chronos_observability::AppMetrics;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend_for(server: &MockServer) -> OpenAiCompletion {
    let config = CompletionConfig::new("sk-test")
        .with_endpoint(format!("{}/v1/chat/completions", server.uri()))
        .with_timeout(Duration::from_millis(500));
    OpenAiCompletion::new(config).unwrap()
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn successful_completion_is_recorded_in_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Rien du tout !" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = AppMetrics::shared();
    let responder = ChatResponder::new(backend_for(&server).await, metrics.clone());
    let (reply, history) = responder
        .respond("Que dois-je emporter ?", ConversationHistory::seeded())
        .await;

    assert_eq!(reply.text, "Rien du tout !");
    assert_eq!(reply.source, ReplySource::Remote);
    assert_eq!(history.len(), 3);
    assert_eq!(history.last().unwrap().role, Role::Assistant);
    assert_eq!(history.last().unwrap().content, "Rien du tout !");
    assert_eq!(metrics.snapshot().remote_completions_total, 1);
}

#[tokio::test]
async fn server_error_falls_back_to_rules() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("upstream down")).await;

    let backend = backend_for(&server).await;
    let err = backend
        .complete(&ConversationHistory::seeded())
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Status { status: 500, .. }));

    let metrics = AppMetrics::shared();
    let responder = ChatResponder::new(backend, metrics.clone());
    let (reply, history) = responder
        .respond("Quels sont vos tarifs ?", ConversationHistory::seeded())
        .await;

    assert_eq!(reply.text, rule_based_reply("Quels sont vos tarifs ?"));
    assert_eq!(reply.source, ReplySource::Fallback);
    assert_eq!(history.len(), 2);
    assert_eq!(history.last().unwrap().role, Role::User);
    assert_eq!(metrics.snapshot().fallback_total, 1);
}

#[tokio::test]
async fn malformed_and_empty_bodies_fall_back() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("not json")).await;
    let backend = backend_for(&server).await;
    let err = backend
        .complete(&ConversationHistory::seeded())
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::MalformedBody(_)));

    let empty = MockServer::start().await;
    mount(
        &empty,
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  " } }]
        })),
    )
    .await;
    let responder = ChatResponder::new(backend_for(&empty).await, AppMetrics::shared());
    let (reply, _) = responder
        .respond("Le voyage est-il dangereux ?", ConversationHistory::seeded())
        .await;
    assert_eq!(reply.source, ReplySource::Fallback);
    assert_eq!(reply.text, rule_based_reply("danger"));
}

#[tokio::test]
async fn slow_completion_times_out_into_fallback() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({ "output_text": "trop tard" }))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let responder = ChatResponder::new(backend_for(&server).await, AppMetrics::shared());
    let (reply, _) = responder
        .respond("Pourquoi choisir Florence ?", ConversationHistory::seeded())
        .await;
    assert_eq!(reply.source, ReplySource::Fallback);
    assert_eq!(reply.text, rule_based_reply("florence"));
}

#[tokio::test]
async fn unreachable_endpoint_falls_back() {
    let config = CompletionConfig::new("sk-test")
        .with_endpoint("http://127.0.0.1:9/v1/chat/completions")
        .with_timeout(Duration::from_secs(2));
    let backend = OpenAiCompletion::new(config).unwrap();

    let err = backend
        .complete(&ConversationHistory::seeded())
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Transport(_)));

    let responder = ChatResponder::new(backend, AppMetrics::shared());
    let (reply, history) = responder
        .respond("Paris m'intéresse", ConversationHistory::seeded())
        .await;
    assert_eq!(reply.text, rule_based_reply("paris"));
    assert_eq!(reply.source, ReplySource::Fallback);
    assert_eq!(history.len(), 2);
}
