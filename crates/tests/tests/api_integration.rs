use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chronos_agents::CompletionConfig;
use chronos_api::{build_app, AppConfig};
use chronos_core::rule_based_reply;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn offline_app() -> Router {
    build_app(AppConfig::default()).expect("app should build")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, parsed)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_offline_mode() {
    let app = offline_app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["completion_mode"], "offline");
    assert_eq!(body["metrics"]["chat_turns_total"], 0);
}

#[tokio::test]
async fn catalog_endpoints_list_static_content() {
    let app = offline_app();

    let (status, body) = send(&app, get("/v1/destinations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destinations"].as_array().unwrap().len(), 3);
    assert_eq!(body["destinations"][0]["price"], 12_500);

    let (_, body) = send(&app, get("/v1/chat/quick-actions")).await;
    assert_eq!(body["quick_actions"][1]["label"], "Prix");

    let (_, body) = send(&app, get("/v1/faq")).await;
    assert_eq!(body["faq"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn offline_chat_answers_pricing_from_rules() {
    let app = offline_app();
    let (status, body) = send(
        &app,
        post_json("/v1/chat", json!({ "text": "Quels sont vos tarifs ?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply_text"], rule_based_reply("Quels sont vos tarifs ?"));
    assert_eq!(body["reply_source"], "rules");
    assert_eq!(body["reply"]["topic"], "pricing");
    assert_eq!(body["message"]["sender"], "bot");

    let session_id = body["session_id"].as_str().unwrap().to_string();
    let (status, body) = send(&app, get(&format!("/v1/chat/{session_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let transcript = body["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[0]["sender"], "bot");
    assert_eq!(transcript[1]["text"], "Quels sont vos tarifs ?");
    assert_eq!(body["awaiting_reply"], false);
}

#[tokio::test]
async fn chat_rejects_blank_text_and_unknown_sessions() {
    let app = offline_app();

    let (status, body) = send(&app, post_json("/v1/chat", json!({ "text": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_message");

    let (status, body) = send(
        &app,
        post_json(
            "/v1/chat",
            json!({ "session_id": "does-not-exist", "text": "bonjour" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_session");

    let (status, _) = send(&app, get("/v1/chat/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn opened_conversation_starts_with_greeting() {
    let app = offline_app();
    let (status, body) = send(&app, post_json("/v1/chat/sessions", json!({}))).await;

    assert_eq!(status, StatusCode::CREATED);
    let transcript = body["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 1);
    assert!(transcript[0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Bienvenue chez TimeTravel Agency"));
}

#[tokio::test]
async fn booking_flow_reaches_confirmation() {
    let app = offline_app();
    let (status, body) = send(&app, post_json("/v1/bookings", json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["step"]["step"], "destination");
    assert_eq!(body["step_valid"], false);
    let commands = format!("/v1/bookings/{}/commands", body["booking_id"].as_str().unwrap());

    let (_, body) = send(&app, post_json(&commands, json!({ "command": "next" }))).await;
    assert_eq!(body["outcome"]["transition"]["kind"], "blocked");

    let steps = [
        json!({ "command": "select_destination", "destination_id": "paris-1889" }),
        json!({ "command": "next" }),
        json!({ "command": "update_details", "departure_date": "2031-04-12", "duration": 5, "travelers": 2 }),
        json!({ "command": "next" }),
        json!({
            "command": "update_info",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "+33 6 12 34 56 78"
        }),
        json!({ "command": "next" }),
    ];
    let mut last = Value::Null;
    for command in steps {
        let (status, body) = send(&app, post_json(&commands, command)).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }

    assert_eq!(last["booking"]["step"]["step"], "confirmation");
    assert_eq!(last["booking"]["total_price"], 25_000);
    assert_eq!(last["booking"]["summary"]["travelers"], 2);

    let (_, body) = send(&app, post_json(&commands, json!({ "command": "confirm" }))).await;
    assert_eq!(body["outcome"]["transition"]["kind"], "confirmed");
    assert_eq!(body["booking"]["confirmed"], true);

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["metrics"]["bookings_confirmed_total"], 1);
}

#[tokio::test]
async fn booking_commands_on_unknown_id_are_not_found() {
    let app = offline_app();
    let (status, body) = send(
        &app,
        post_json("/v1/bookings/nope/commands", json!({ "command": "next" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_booking");
}

#[tokio::test]
async fn quiz_scores_answer_sheets() {
    let app = offline_app();

    let (_, body) = send(&app, get("/v1/quiz")).await;
    assert_eq!(body["questions"].as_array().unwrap().len(), 4);

    let (status, body) = send(
        &app,
        post_json("/v1/quiz/result", json!({ "answers": [1, 1, 1, 1] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["destination_id"], "cretace");

    let (status, body) = send(
        &app,
        post_json("/v1/quiz/result", json!({ "answers": [0, 5] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn overlapping_turn_is_a_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "Bien sûr !" } }]
                }))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;

    let completion = CompletionConfig::new("sk-test")
        .with_endpoint(format!("{}/v1/chat/completions", server.uri()));
    let app = build_app(AppConfig::default().with_completion(completion)).unwrap();

    let (_, opened) = send(&app, post_json("/v1/chat/sessions", json!({}))).await;
    let session_id = opened["session_id"].as_str().unwrap().to_string();
    let turn = json!({ "session_id": session_id, "text": "Parlez-moi du Crétacé" });

    let (first, second) = tokio::join!(send(&app, post_json("/v1/chat", turn.clone())), async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        send(&app, post_json("/v1/chat", turn.clone())).await
    });

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first.1["reply_source"], "remote");
    assert_eq!(second.0, StatusCode::CONFLICT);
    assert_eq!(second.1["error"], "turn_in_flight");

    let (status, body) = send(&app, post_json("/v1/chat", turn)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply_text"], "Bien sûr !");
}
