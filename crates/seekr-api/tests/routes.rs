//! End-to-end checks of the HTTP surface against an in-memory database.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use seekr_api::{AppStateInner, router};
use seekr_db::Database;
use seekr_types::api::Claims;

const SECRET: &str = "test-secret";

fn app() -> Router {
    let db = Database::open_in_memory().expect("in-memory database");
    router(AppStateInner::new(db, SECRET.to_string()))
}

fn token_for(owner: &str) -> String {
    let claims = Claims {
        sub: owner.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token")
}

async fn send(app: &Router, owner: &str, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(owner)));
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("router dispatch");
    let status = response.status();
    let body = to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .expect("body");
    (status, body.to_vec())
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json payload")
}

async fn create_application(app: &Router, owner: &str, company: &str) -> String {
    let (status, body) = send(
        app,
        owner,
        "POST",
        "/api/applications",
        Some(json!({
            "company": company,
            "position": "Engineer",
            "application_date": "2024-01-02",
            "job_posting_url": "https://jobs.example.com/1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json(&body)["data"]["id"]
        .as_str()
        .expect("id")
        .to_string()
}

#[tokio::test]
async fn health_needs_no_token() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_rejects_missing_or_forged_tokens() {
    let app = app();

    let missing = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/applications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let forged = encode(
        &Header::default(),
        &Claims {
            sub: "u1".into(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        },
        &EncodingKey::from_secret(b"other-secret"),
    )
    .unwrap();
    let forged = app
        .oneshot(
            Request::builder()
                .uri("/api/applications")
                .header(header::AUTHORIZATION, format!("Bearer {forged}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lists_applications_with_interview_counts() {
    let app = app();
    let (status, body) = send(&app, "u1", "GET", "/api/applications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["data"], json!([]));

    let id = create_application(&app, "u1", "Acme").await;
    let (status, _) = send(
        &app,
        "u1",
        "POST",
        "/api/interviews",
        Some(json!({
            "application_id": id,
            "interview_date": "2024-01-10T09:00:00Z",
            "topic": "Intro call"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "u1", "GET", "/api/applications", None).await;
    let listed = json(&body);
    assert_eq!(listed["data"][0]["id"], json!(id));
    assert_eq!(listed["data"][0]["interviewsCount"], json!(1));
    assert_eq!(listed["data"][0]["status"], json!("applied"));
}

#[tokio::test]
async fn other_owners_get_not_found() {
    let app = app();
    let id = create_application(&app, "u1", "Acme").await;

    let (status, body) = send(&app, "u2", "GET", &format!("/api/applications/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], json!("Not found"));

    let (status, _) = send(
        &app,
        "u2",
        "PUT",
        &format!("/api/applications/{id}"),
        Some(json!({ "type": "set_status", "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "u2", "DELETE", &format!("/api/applications/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "u1", "GET", &format!("/api/applications/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_commands_change_one_field() {
    let app = app();
    let id = create_application(&app, "u1", "Acme").await;

    let (status, body) = send(
        &app,
        "u1",
        "PUT",
        &format!("/api/applications/{id}"),
        Some(json!({ "type": "set_status", "status": "offer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["data"]["status"], json!("offer"));

    let (status, body) = send(
        &app,
        "u1",
        "PUT",
        &format!("/api/applications/{id}"),
        Some(json!({ "type": "set_job_description", "job_description": "Rust services" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &json(&body)["data"];
    assert_eq!(data["job_description"], json!("Rust services"));
    assert_eq!(data["status"], json!("offer"));
}

#[tokio::test]
async fn repeated_create_with_same_id_conflicts() {
    let app = app();
    let payload = json!({
        "id": "7b1c4f3e-9d7a-4c55-8a8e-2f6f0f1b7c11",
        "company": "Acme",
        "position": "Engineer",
        "application_date": "2024-01-02"
    });

    let (status, _) = send(&app, "u1", "POST", "/api/applications", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "u1", "POST", "/api/applications", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "u1", "GET", "/api/applications", None).await;
    assert_eq!(json(&body)["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn reusing_another_owners_ids_is_not_found() {
    let app = app();
    let theirs = create_application(&app, "u1", "Acme").await;
    let (status, body) = send(
        &app,
        "u1",
        "POST",
        "/api/interviews",
        Some(json!({
            "application_id": theirs,
            "interview_date": "2024-01-10T09:00:00Z",
            "topic": "Screen"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let their_interview = json(&body)["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "u2",
        "POST",
        "/api/applications",
        Some(json!({
            "id": theirs,
            "company": "Globex",
            "position": "Engineer",
            "application_date": "2024-01-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], json!("Not found"));

    let mine = create_application(&app, "u2", "Initech").await;
    let (status, _) = send(
        &app,
        "u2",
        "POST",
        "/api/interviews",
        Some(json!({
            "id": their_interview,
            "application_id": mine,
            "interview_date": "2024-01-11T09:00:00Z",
            "topic": "Screen"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "u2", "GET", &format!("/api/interviews/{their_interview}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_get_the_error_envelope() {
    let app = app();
    let id = create_application(&app, "u1", "Acme").await;

    let (status, body) = send(
        &app,
        "u1",
        "PUT",
        &format!("/api/applications/{id}"),
        Some(json!({ "type": "set_status", "status": "ghosted" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json(&body)["error"].is_string());

    let (status, body) = send(&app, "u1", "GET", "/api/applications/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
}

#[tokio::test]
async fn interview_comments_can_be_added_and_removed() {
    let app = app();
    let application_id = create_application(&app, "u1", "Acme").await;
    let (_, body) = send(
        &app,
        "u1",
        "POST",
        "/api/interviews",
        Some(json!({
            "application_id": application_id,
            "interview_date": "2024-01-10T09:00:00Z",
            "topic": "System design",
            "participants": "Staff engineers"
        })),
    )
    .await;
    let interview_id = json(&body)["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "u1",
        "POST",
        &format!("/api/interviews/{interview_id}/comments"),
        Some(json!({ "comment": "Ask about on-call", "pinned": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = json(&body)["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "u1", "GET", &format!("/api/interviews/{interview_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let details = json(&body);
    assert_eq!(details["data"]["topic"], json!("System design"));
    assert_eq!(details["data"]["comments"][0]["pinned"], json!(true));

    let uri = format!("/api/interviews/{interview_id}/comments/{comment_id}");
    let (status, _) = send(&app, "u2", "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "u1", "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"done");
}

#[tokio::test]
async fn deleting_of_user_only_touches_the_caller() {
    let app = app();
    create_application(&app, "u1", "Acme").await;
    create_application(&app, "u2", "Globex").await;

    let (status, _) = send(&app, "u1", "DELETE", "/api/applications/of-user", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "u1", "GET", "/api/applications", None).await;
    assert_eq!(json(&body)["data"], json!([]));
    let (_, body) = send(&app, "u2", "GET", "/api/applications", None).await;
    assert_eq!(json(&body)["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn export_streams_a_pdf_attachment() {
    let app = app();
    create_application(&app, "u1", "Acme").await;

    let request = Request::builder()
        .uri("/api/export")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for("u1")))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"export-"));

    let body = to_bytes(response.into_body(), 16 * 1024 * 1024).await.unwrap();
    assert!(body.starts_with(b"%PDF-"));
}
