// ABOUTME: End-to-end tests driving the router with in-memory requests
// ABOUTME: Covers the OTP registration flow, role gates, and request resolution

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use hemobank_api::{create_router, AppState};
use hemobank_auth::{hash_password, Keys};
use hemobank_core::Role;
use hemobank_notify::{Mailer, MailerConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret-at-least-32-characters!!";

async fn test_app() -> (Router, SqlitePool, Keys) {
    let pool = hemobank_storage::connect("sqlite::memory:").await.unwrap();
    let keys = Keys::new(TEST_SECRET);
    let mailer = Mailer::new(MailerConfig::disabled("noreply@hemobank.local"));
    let state = AppState::new(
        pool.clone(),
        mailer,
        keys.clone(),
        "admin@hemobank.local".to_string(),
    );
    (create_router(state), pool, keys)
}

async fn seed_admin(pool: &SqlitePool) -> i64 {
    let hash = hash_password("admin123").unwrap();
    sqlx::query(
        "INSERT INTO admins (name, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind("Bank Admin")
    .bind("admin@hemobank.local")
    .bind(hash)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn donor_payload(registration_token: &str) -> Value {
    json!({
        "registrationToken": registration_token,
        "password": "s3cret-pass",
        "name": "Rajan Kumar",
        "age": 28,
        "sex": "Male",
        "phone": "9841234501",
        "email": "rajan.kumar@example.com",
        "bloodGroup": "O+",
        "weight": 72.0,
        "haemoglobin": "normal",
        "bloodSugar": "normal",
        "bloodPressure": "normal"
    })
}

/// Runs the OTP exchange for an address and returns the registration token.
async fn verified_registration_token(app: &Router, pool: &SqlitePool, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/otp/request",
        None,
        Some(json!({ "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let code: String =
        sqlx::query_scalar("SELECT token FROM verification_tokens WHERE identifier = ?")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/otp/verify",
        None,
        Some(json!({ "email": email, "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["registrationToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (app, _, _) = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn otp_registration_and_login_flow() {
    let (app, pool, _) = test_app().await;

    let token =
        verified_registration_token(&app, &pool, "rajan.kumar@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/donors",
        None,
        Some(donor_payload(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["donor"]["eligibility"], "Eligible!!");
    assert!(body["data"]["token"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login/donor",
        None,
        Some(json!({ "email": "rajan.kumar@example.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "donor");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login/donor",
        None,
        Some(json!({ "email": "rajan.kumar@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_rejects_mismatched_token_and_bad_phone() {
    let (app, pool, _) = test_app().await;

    let token = verified_registration_token(&app, &pool, "other@example.com").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/donors",
        None,
        Some(donor_payload(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let token =
        verified_registration_token(&app, &pool, "rajan.kumar@example.com").await;
    let mut payload = donor_payload(&token);
    payload["phone"] = json!("12345");
    let (status, body) = send(&app, Method::POST, "/api/donors", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn admin_routes_require_an_admin_session() {
    let (app, _, keys) = test_app().await;

    let (status, _) = send(&app, Method::GET, "/api/donors", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let donor_token = keys.sign_session(1, Role::Donor, "Rajan").unwrap();
    let (status, _) = send(&app, Method::GET, "/api/donors", Some(&donor_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_recipient_phone_conflicts_with_existing_id() {
    let (app, _, _) = test_app().await;

    let recipient = json!({
        "name": "Meera Pillai",
        "age": 45,
        "sex": "Female",
        "phone": "9000000010",
        "bloodGroup": "B+"
    });

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/recipients",
        None,
        Some(recipient.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let existing_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::POST, "/api/recipients", None, Some(recipient)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains(&format!("id {existing_id}")));
}

#[tokio::test]
async fn blood_request_resolution_updates_stock_over_http() {
    let (app, pool, _) = test_app().await;
    seed_admin(&pool).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login/admin",
        None,
        Some(json!({ "email": "admin@hemobank.local", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let admin_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/stock",
        Some(&admin_token),
        Some(json!({ "bloodGroup": "B+", "quantity": 5, "operation": "set" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/recipients",
        None,
        Some(json!({
            "name": "Meera Pillai",
            "age": 45,
            "sex": "Female",
            "phone": "9000000010",
            "bloodGroup": "B+"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let recipient_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/requests",
        None,
        Some(json!({
            "recipientId": recipient_id,
            "recipientName": "Meera Pillai",
            "bloodGroup": "B+",
            "quantity": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/requests/{request_id}/resolve"),
        Some(&admin_token),
        Some(json!({ "action": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "APPROVED");

    let (status, body) = send(&app, Method::GET, "/api/stock", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let remaining = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["bloodGroup"] == "B+")
        .map(|row| row["quantity"].as_i64().unwrap())
        .unwrap();
    assert_eq!(remaining, 3);

    // A second approval attempt conflicts and deducts nothing.
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/requests/{request_id}/resolve"),
        Some(&admin_token),
        Some(json!({ "action": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn eligibility_check_is_public_and_pure() {
    let (app, _, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/eligibility/check",
        None,
        Some(json!({
            "age": 30,
            "weight": 70.0,
            "haemoglobin": "normal",
            "bloodPressure": "normal"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["eligible"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/eligibility/check",
        None,
        Some(json!({
            "age": 16,
            "weight": 70.0,
            "haemoglobin": "normal",
            "bloodPressure": "normal"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["eligible"], false);
}
