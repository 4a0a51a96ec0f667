//! `BackendClient` against a local `tiny_http` server.

use std::io::Read;
use std::sync::mpsc;
use std::time::Duration;

use campus_client::{BackendClient, ClientError, QuizBackend};
use campus_core::entities::{AnswerValue, DomainDescriptor, QuestionId};
use campus_core::enums::{Phase, QuestionKind};
use campus_core::responses::{
    ActionRequest, PhaseOutcome, ResponseEntry, SearchRequest, SubmitRequest,
};
use pretty_assertions::assert_eq;

struct Captured {
    method: String,
    url: String,
    body: String,
}

/// Serve one canned `(status, body)` reply per incoming request, in order.
fn serve(replies: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Captured>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        for (status, body) in replies {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let mut content = String::new();
            request.as_reader().read_to_string(&mut content).unwrap();
            let _ = tx.send(Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body: content,
            });
            let response = tiny_http::Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap(),
                );
            let _ = request.respond(response);
        }
    });

    (format!("http://127.0.0.1:{port}"), rx)
}

fn client(base_url: &str) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(5), "campus-test").unwrap()
}

fn body_json(captured: &Captured) -> serde_json::Value {
    serde_json::from_str(&captured.body).unwrap()
}

#[tokio::test]
async fn fetches_initial_questions_with_numeric_ids() {
    let (base, rx) = serve(vec![(
        200,
        r#"{"questions": [
            {"id": 1, "question": "Budget?", "type": "single_choice", "options": ["Low", "High"]},
            {"id": 2, "question": "Anything else?"}
        ]}"#,
    )]);

    let questions = client(&base)
        .fetch_initial_questions(&DomainDescriptor::new("dorm"))
        .await
        .unwrap();

    let captured = rx.recv().unwrap();
    assert_eq!(captured.method, "GET");
    assert_eq!(captured.url, "/api/modules/dorm");
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].id, QuestionId::Initial(1));
    assert_eq!(questions[1].kind, QuestionKind::FreeText);
}

#[tokio::test]
async fn initial_submit_posts_responses_and_decodes_follow_ups() {
    let (base, rx) = serve(vec![(
        200,
        r#"{"ai_questions": [{"id": "f1", "prompt": "Why?", "type": "free_text"}]}"#,
    )]);
    let request = SubmitRequest {
        responses: vec![ResponseEntry {
            question_id: QuestionId::Initial(1),
            answer: AnswerValue::Single("A".into()),
        }],
    };

    let outcome = client(&base)
        .submit_phase(&DomainDescriptor::new("dorm"), Phase::Initial, &request)
        .await
        .unwrap();

    let captured = rx.recv().unwrap();
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.url, "/api/modules/dorm");
    assert_eq!(
        body_json(&captured),
        serde_json::json!({"responses": [{"question_id": 1, "answer": "A"}]})
    );
    let PhaseOutcome::FollowUp(questions) = outcome else {
        panic!("expected follow-up questions");
    };
    assert_eq!(questions[0].id, QuestionId::FollowUp("f1".into()));
}

#[tokio::test]
async fn follow_up_submit_uses_follow_up_path() {
    let (base, rx) = serve(vec![(
        200,
        r#"{"recommendations": [{"id": "dorm-maple", "title": "Maple Hall", "score": 88}]}"#,
    )]);
    let request = SubmitRequest {
        responses: vec![ResponseEntry {
            question_id: QuestionId::FollowUp("f1".into()),
            answer: AnswerValue::Single("Near the gym".into()),
        }],
    };

    let outcome = client(&base)
        .submit_phase(&DomainDescriptor::new("dorm"), Phase::FollowUp, &request)
        .await
        .unwrap();

    assert_eq!(rx.recv().unwrap().url, "/api/modules/dorm/ai-questions");
    let PhaseOutcome::Recommendations(recs) = outcome else {
        panic!("expected recommendations");
    };
    assert_eq!(recs[0].title, "Maple Hall");
}

#[tokio::test]
async fn search_sends_current_ids() {
    let (base, rx) = serve(vec![(
        200,
        r#"{"recommendations": [{"id": 12, "name": "Cedar Towers", "match_score": 70}]}"#,
    )]);
    let mut descriptor = DomainDescriptor::new("dorm");
    descriptor.search_path = Some("/api/{domain}/search".into());

    let recs = client(&base)
        .search(
            &descriptor,
            &SearchRequest {
                search: "closer to the gym".into(),
                current_recommendations: vec!["dorm-maple".into()],
            },
        )
        .await
        .unwrap();

    let captured = rx.recv().unwrap();
    assert_eq!(captured.url, "/api/dorm/search");
    assert_eq!(
        body_json(&captured),
        serde_json::json!({"search": "closer to the gym", "current_recommendations": ["dorm-maple"]})
    );
    assert_eq!(recs[0].id, "12");
}

#[tokio::test]
async fn commit_action_decodes_success_flag() {
    let (base, rx) = serve(vec![(200, r#"{"success": false, "message": "full"}"#)]);
    let mut descriptor = DomainDescriptor::new("enrollment");
    descriptor.action_path = Some("/api/enrollment/enroll".into());

    let response = client(&base)
        .commit_action(
            &descriptor,
            &ActionRequest {
                action: "enroll".into(),
                recommendation_ids: vec!["cs-101".into()],
            },
        )
        .await
        .unwrap();

    assert_eq!(
        body_json(&rx.recv().unwrap()),
        serde_json::json!({"action": "enroll", "recommendation_ids": ["cs-101"]})
    );
    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("full"));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let (base, _rx) = serve(vec![(500, r#"{"error": "boom"}"#)]);
    let err = client(&base)
        .fetch_initial_questions(&DomainDescriptor::new("jobs"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
}

#[tokio::test]
async fn missing_fields_are_parse_errors() {
    let (base, _rx) = serve(vec![(200, r#"{"status": "ok"}"#)]);
    let request = SubmitRequest { responses: Vec::new() };
    let err = client(&base)
        .submit_phase(&DomainDescriptor::new("jobs"), Phase::Initial, &request)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            std::thread::sleep(Duration::from_secs(2));
            let _ = request.respond(tiny_http::Response::from_string("{}"));
        }
    });

    let client = BackendClient::new(
        format!("http://127.0.0.1:{port}"),
        Duration::from_millis(200),
        "campus-test",
    )
    .unwrap();
    let err = client
        .fetch_initial_questions(&DomainDescriptor::new("dorm"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)));
}
