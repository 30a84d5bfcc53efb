//! End-to-end tests for the HTTP layer.
//!
//! Each test builds the full application over the in-memory store and
//! drives it with `tower::ServiceExt::oneshot`; no TCP port is bound.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use event_tracking_api::api::build_app;
use event_tracking_api::api::messages;
use event_tracking_api::app_state::AppState;
use event_tracking_api::persistence::InMemoryPersistence;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    store: InMemoryPersistence,
    router: axum::Router,
}

fn app_with(show_error_details: bool) -> TestApp {
    let store = InMemoryPersistence::new();
    let router = build_app(AppState::new(store.clone(), show_error_details));
    TestApp { store, router }
}

fn app() -> TestApp {
    app_with(false)
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create_person(&self, body: Value) -> Value {
        let (status, body) = self.send(Method::POST, "/persons", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }

    async fn create_event(&self, person_id: &str, event_type: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/events",
                Some(json!({ "event_type": event_type, "person_id": person_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id should be a string").to_string()
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_greet_on_home() {
    let app = app();
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let Some(stamp) = text.strip_prefix("Hello, World! ") else {
        panic!("unexpected greeting: {text}");
    };
    assert!(
        chrono::DateTime::parse_from_rfc3339(stamp).is_ok(),
        "not an RFC 3339 timestamp: {stamp}"
    );
}

#[tokio::test]
async fn should_report_healthy() {
    let (status, body) = app().send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn should_serve_openapi_document() {
    let (status, body) = app().send(Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/persons"].is_object());
}

#[tokio::test]
async fn crash_test_hides_cause_unless_enabled() {
    let (status, body) = app_with(false).send(Method::GET, "/crash_test", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(
        body["response"]["details"],
        messages::internal_server_error_message()
    );
    assert_eq!(body["response"]["message"], "Internal Server Error");
    assert_eq!(body["response"]["status"], 500);

    let (status, body) = app_with(true).send(Method::GET, "/crash_test", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["response"]["details"],
        messages::with_error_details(&messages::internal_server_error_message(), "Crash test")
    );
}

// ---------------------------------------------------------------------------
// Persons
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_lists_are_successful() {
    let app = app();
    for uri in ["/persons", "/events"] {
        let (status, body) = app.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["response"]["details"], messages::empty_collection_message());
        assert_eq!(body["response"]["message"], "Ok");
    }
}

#[tokio::test]
async fn created_person_round_trips() {
    let app = app();
    let created = app
        .create_person(json!({
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "role": "admin",
            "events": ["ignored"]
        }))
        .await;
    assert_eq!(created["events"], json!([]));
    assert_eq!(created["datetime_created"], created["datetime_modified"]);

    let id = id_of(&created);
    let (status, body) = app.send(Method::GET, &format!("/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);
    assert_eq!(body["response"]["details"], messages::successful_message());

    let (_, list) = app.send(Method::GET, "/persons", None).await;
    assert_eq!(list["data"], json!([created]));
}

#[tokio::test]
async fn created_response_says_ok_with_201() {
    let (status, body) = app()
        .send(Method::POST, "/persons", Some(json!({ "first_name": "Grace" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["response"]["status"], 201);
    assert_eq!(body["response"]["message"], "Ok");
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn client_supplied_id_is_kept_and_duplicates_rejected() {
    let app = app();
    let id = "6f1c1e0e-4b7a-4a55-9a43-3c5b2f0e9d11";
    let created = app.create_person(json!({ "id": id })).await;
    assert_eq!(created["id"], id);

    let (status, body) = app
        .send(Method::POST, "/persons", Some(json!({ "id": id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"]["details"], messages::not_created_message("Person"));
    assert_eq!(app.store.person_count().await, 1);
}

#[tokio::test]
async fn missing_person_is_not_found() {
    let id = "00000000-0000-4000-8000-000000000000";
    let (status, body) = app().send(Method::GET, &format!("/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(
        body["response"]["details"],
        messages::not_found_by_id_message("Person", id)
    );
    assert_eq!(body["response"]["message"], "Not Found");
}

#[tokio::test]
async fn malformed_route_id_is_a_bad_request() {
    let (status, body) = app().send(Method::GET, "/persons/42", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"]["details"], messages::bad_request_message());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request_envelope() {
    let app = app_with(true);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/persons")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], Value::Null);
    let details = body["response"]["details"].as_str().unwrap();
    assert!(details.starts_with(&messages::bad_request_message()));
    assert!(details.contains(" Details: \n "));
    assert_eq!(app.store.person_count().await, 0);
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_creation_time() {
    let app = app();
    let created = app
        .create_person(json!({ "email": "old@example.com", "first_name": "Old" }))
        .await;
    let id = id_of(&created);
    let event_id = "11111111-1111-4111-8111-111111111111";

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/persons/{id}"),
            Some(json!({
                "id": id,
                "email": "new@example.com",
                "first_name": "New",
                "role": "admin",
                "events": [event_id]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let updated = &body["data"];
    assert_eq!(updated["email"], "new@example.com");
    assert_eq!(updated["last_name"], Value::Null);
    assert_eq!(updated["role"], "admin");
    assert_eq!(updated["events"], json!([event_id]));
    assert_eq!(updated["datetime_created"], created["datetime_created"]);
}

#[tokio::test]
async fn update_with_mismatched_ids_changes_nothing() {
    let app = app();
    let created = app.create_person(json!({ "first_name": "Ada" })).await;
    let id = id_of(&created);
    let other = "22222222-2222-4222-8222-222222222222";

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/persons/{id}"),
            Some(json!({ "id": other, "first_name": "Eve" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["response"]["details"],
        messages::route_request_mismatch_message(&id, other)
    );

    let (_, body) = app.send(Method::GET, &format!("/persons/{id}"), None).await;
    assert_eq!(body["data"]["first_name"], "Ada");
}

#[tokio::test]
async fn update_of_missing_person_is_not_found() {
    let id = "33333333-3333-4333-8333-333333333333";
    let (status, _) = app()
        .send(Method::PUT, &format!("/persons/{id}"), Some(json!({ "id": id })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_requires_matching_id() {
    let app = app();
    let created = app.create_person(json!({})).await;
    let id = id_of(&created);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/persons/{id}"),
            Some(json!({ "id": "44444444-4444-4444-8444-444444444444" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.person_count().await, 1);

    let (status, body) = app
        .send(Method::DELETE, &format!("/persons/{id}"), Some(json!({ "id": id })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(app.store.person_count().await, 0);

    let (status, _) = app
        .send(Method::DELETE, &format!("/persons/{id}"), Some(json!({ "id": id })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_person_removes_their_events() {
    let app = app();
    let owner = id_of(&app.create_person(json!({})).await);
    let bystander = id_of(&app.create_person(json!({})).await);
    app.create_event(&owner, "click").await;
    app.create_event(&owner, "signup").await;
    app.create_event(&bystander, "click").await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/persons/{owner}"), Some(json!({ "id": owner })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send(Method::GET, "/events", None).await;
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["person_id"], bystander);
}

#[tokio::test]
async fn update_moves_modified_time_forward() {
    let app = app();
    let created = app
        .create_person(json!({
            "email": "old@example.com",
            "datetime_created": "2023-01-01T00:00:00Z"
        }))
        .await;
    let id = id_of(&created);
    assert_eq!(created["datetime_modified"], created["datetime_created"]);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/persons/{id}"),
            Some(json!({ "id": id, "email": "new@example.com", "role": "user", "events": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let parse = |value: &Value| {
        chrono::DateTime::parse_from_rfc3339(value.as_str().unwrap()).unwrap()
    };
    let updated = &body["data"];
    assert_eq!(parse(&updated["datetime_created"]), parse(&created["datetime_created"]));
    assert!(parse(&updated["datetime_modified"]) > parse(&created["datetime_modified"]));
}

#[tokio::test]
async fn overlong_person_text_is_not_created() {
    let app = app();
    let email = format!("{}@example.com", "a".repeat(29));
    let (status, body) = app
        .send(Method::POST, "/persons", Some(json!({ "email": email })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["response"]["details"], messages::not_created_message("Person"));
    assert_eq!(app.store.person_count().await, 0);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn event_for_missing_person_is_not_found_and_not_stored() {
    let app = app();
    let person_id = "55555555-5555-4555-8555-555555555555";
    let (status, body) = app
        .send(
            Method::POST,
            "/events",
            Some(json!({ "event_type": "click", "person_id": person_id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["response"]["details"],
        messages::not_found_by_id_message("Person", person_id)
    );
    assert_eq!(app.store.event_count().await, 0);
}

#[tokio::test]
async fn created_event_round_trips() {
    let app = app();
    let person_id = id_of(&app.create_person(json!({})).await);
    let created = app.create_event(&person_id, "submitted_feedback").await;
    assert_eq!(created["event_type"], "submitted_feedback");
    assert_eq!(created["person_id"], person_id);

    let id = id_of(&created);
    let (status, body) = app.send(Method::GET, &format!("/events/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn unknown_event_type_is_rejected() {
    let app = app();
    let person_id = id_of(&app.create_person(json!({})).await);
    let (status, _) = app
        .send(
            Method::POST,
            "/events",
            Some(json!({ "event_type": "purchase", "person_id": person_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.event_count().await, 0);
}

#[tokio::test]
async fn events_filter_by_keyword() {
    let app = app();
    let person_id = id_of(&app.create_person(json!({})).await);
    app.create_event(&person_id, "click").await;
    app.create_event(&person_id, "signup").await;
    app.create_event(&person_id, "click").await;

    let (status, body) = app.send(Method::GET, "/events?keyword=click", None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["event_type"] == "click"));

    let (status, body) = app
        .send(Method::GET, "/events?keyword=submitted_feedback", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = app.send(Method::GET, "/events?keyword=purchase", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_update_changes_type_and_checks_ids() {
    let app = app();
    let person_id = id_of(&app.create_person(json!({})).await);
    let created = app.create_event(&person_id, "click").await;
    let id = id_of(&created);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/events/{id}"),
            Some(json!({
                "id": "66666666-6666-4666-8666-666666666666",
                "event_type": "signup",
                "person_id": person_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/events/{id}"),
            Some(json!({ "id": id, "event_type": "signup", "person_id": person_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["event_type"], "signup");
    assert_eq!(body["data"]["datetime_created"], created["datetime_created"]);
}

#[tokio::test]
async fn event_delete_flow() {
    let app = app();
    let person_id = id_of(&app.create_person(json!({})).await);
    let id = id_of(&app.create_event(&person_id, "click").await);

    let (status, _) = app
        .send(Method::DELETE, &format!("/events/{id}"), Some(json!({ "id": person_id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.event_count().await, 1);

    let (status, _) = app
        .send(Method::DELETE, &format!("/events/{id}"), Some(json!({ "id": id })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.event_count().await, 0);

    let (status, body) = app.send(Method::GET, &format!("/events/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["response"]["details"],
        messages::not_found_by_id_message("Event", &id)
    );
}

// ---------------------------------------------------------------------------
// Routing and extraction failures
// ---------------------------------------------------------------------------

fn assert_bad_request_envelope(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["response"]["status"], 400);
    assert_eq!(body["response"]["message"], "Bad Request");
    assert_eq!(body["response"]["details"], messages::bad_request_message());
}

#[tokio::test]
async fn non_utf8_route_segment_is_a_bad_request_envelope() {
    let app = app();
    let (status, body) = app.send(Method::GET, "/persons/%FF", None).await;
    assert_bad_request_envelope(status, &body);

    let (status, body) = app
        .send(Method::DELETE, "/events/%FF", Some(json!({ "id": "%FF" })))
        .await;
    assert_bad_request_envelope(status, &body);
}

#[tokio::test]
async fn repeated_keyword_is_a_bad_request_envelope() {
    let (status, body) = app()
        .send(Method::GET, "/events?keyword=click&keyword=signup", None)
        .await;
    assert_bad_request_envelope(status, &body);
}

#[tokio::test]
async fn unsupported_method_is_a_405_envelope() {
    let uri = "/persons/11111111-1111-4111-8111-111111111111";
    let (status, body) = app().send(Method::PATCH, uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["response"]["status"], 405);
    assert_eq!(body["response"]["message"], "Method Not Allowed");
    assert_eq!(
        body["response"]["details"],
        messages::method_not_allowed_message(Method::PATCH, uri)
    );
}

#[tokio::test]
async fn unknown_route_is_a_404_envelope() {
    let (status, body) = app().send(Method::GET, "/people", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["response"]["status"], 404);
    assert_eq!(body["response"]["message"], "Not Found");
    assert_eq!(
        body["response"]["details"],
        messages::route_not_found_message("/people")
    );
}
