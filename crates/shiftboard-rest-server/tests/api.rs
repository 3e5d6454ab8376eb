//! End-to-end API tests against a server bound to an ephemeral port.

use std::net::TcpListener;
use std::time::Duration;

use serde_json::{json, Value};
use shiftboard_credentials::KdfParams;
use shiftboard_rest_server::config::RateLimitConfig;
use shiftboard_rest_server::mock_dependencies::MockServerDependencies;
use shiftboard_rest_server::{Server, ServerConfig};
use tokio::task::JoinHandle;

fn test_config() -> ServerConfig {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind to ephemeral port");
    let addr = listener.local_addr().expect("port");
    drop(listener);

    ServerConfig {
        bind_addr: addr,
        enable_cors: true,
        // Keep the KDF cheap in tests; the contract does not depend on the count.
        kdf: KdfParams { iterations: 1000 },
        // Every request in a test comes from the same loopback peer
        rate_limit: RateLimitConfig {
            requests_per_minute: 10_000,
            burst_size: 10_000,
        },
        ..Default::default()
    }
}

async fn spawn_mock_server() -> (String, JoinHandle<()>) {
    let config = test_config();
    let deps = MockServerDependencies::new(config.clone()).await.expect("mock deps");
    let server = Server::with_state(config.clone(), deps.into_state());
    let base_url = format!("http://{}", config.bind_addr);

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    wait_for_health(&base_url).await;
    (base_url, handle)
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    let healthz = format!("{}/api/v1/healthz", base_url);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        if let Ok(response) = client.get(&healthz).send().await {
            if response.status().is_success() {
                return;
            }
        }
        if tokio::time::Instant::now() > deadline {
            panic!("server did not become healthy at {}", healthz);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

async fn approve_email(client: &reqwest::Client, base_url: &str, email: &str) {
    let response = client
        .post(format!("{}/api/v1/approved-emails", base_url))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("approve email");
    assert_eq!(response.status(), 201);
}

async fn register_user(client: &reqwest::Client, base_url: &str, email: &str) -> Value {
    let response = client
        .post(format!("{}/api/v1/users", base_url))
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Reyes",
            "email": email,
            "password": "hunter2",
            "role": "venue_member"
        }))
        .send()
        .await
        .expect("register");
    assert_eq!(response.status(), 201);
    response.json().await.expect("user json")
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (base_url, handle) = spawn_mock_server().await;
    let client = reqwest::Client::new();

    for path in ["healthz", "readyz", "version"] {
        let response = client
            .get(format!("{}/api/v1/{}", base_url, path))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), 200, "{path}");
    }

    handle.abort();
}

#[tokio::test]
async fn registration_is_gated_on_approved_emails() {
    let (base_url, handle) = spawn_mock_server().await;
    let client = reqwest::Client::new();

    // Not approved yet: rejected with 403
    let response = client
        .post(format!("{}/api/v1/users", base_url))
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Reyes",
            "email": "ana@venue.test",
            "password": "hunter2"
        }))
        .send()
        .await
        .expect("register attempt");
    assert_eq!(response.status(), 403);

    approve_email(&client, &base_url, "ana@venue.test").await;
    let user = register_user(&client, &base_url, "ana@venue.test").await;
    assert_eq!(user["email"], "ana@venue.test");
    assert_eq!(user["role"], "venue_member");
    assert!(
        user.get("password").is_none(),
        "credential must never be serialized"
    );

    // Same email again: conflict
    let response = client
        .post(format!("{}/api/v1/users", base_url))
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Reyes",
            "email": "ana@venue.test",
            "password": "hunter2"
        }))
        .send()
        .await
        .expect("duplicate register");
    assert_eq!(response.status(), 409);

    handle.abort();
}

#[tokio::test]
async fn login_verifies_the_stored_credential() {
    let (base_url, handle) = spawn_mock_server().await;
    let client = reqwest::Client::new();

    approve_email(&client, &base_url, "ana@venue.test").await;
    register_user(&client, &base_url, "ana@venue.test").await;

    let response = client
        .post(format!("{}/api/v1/login", base_url))
        .json(&json!({ "email": "ana@venue.test", "password": "hunter2" }))
        .send()
        .await
        .expect("login");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("login json");
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "ana@venue.test");
    assert!(body["user"].get("password").is_none());

    // Wrong password and unknown email are the same 401
    let response = client
        .post(format!("{}/api/v1/login", base_url))
        .json(&json!({ "email": "ana@venue.test", "password": "hunter3" }))
        .send()
        .await
        .expect("bad password");
    assert_eq!(response.status(), 401);

    let response = client
        .post(format!("{}/api/v1/login", base_url))
        .json(&json!({ "email": "nobody@venue.test", "password": "hunter2" }))
        .send()
        .await
        .expect("unknown email");
    assert_eq!(response.status(), 401);

    // Missing fields are a validation failure, not an auth failure
    let response = client
        .post(format!("{}/api/v1/login", base_url))
        .json(&json!({ "email": "", "password": "" }))
        .send()
        .await
        .expect("empty login");
    assert_eq!(response.status(), 400);

    handle.abort();
}

#[tokio::test]
async fn user_lifecycle() {
    let (base_url, handle) = spawn_mock_server().await;
    let client = reqwest::Client::new();

    approve_email(&client, &base_url, "ana@venue.test").await;
    let user = register_user(&client, &base_url, "ana@venue.test").await;
    let user_id = user["id"].as_i64().expect("id");

    let response = client
        .get(format!("{}/api/v1/users/{}", base_url, user_id))
        .send()
        .await
        .expect("get user");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/api/v1/users", base_url))
        .send()
        .await
        .expect("list users");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("list json");
    assert_eq!(body["total"], 1);
    assert!(body["items"][0].get("password").is_none());

    let response = client
        .delete(format!("{}/api/v1/users/{}", base_url, user_id))
        .send()
        .await
        .expect("delete user");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/api/v1/users/{}", base_url, user_id))
        .send()
        .await
        .expect("get deleted user");
    assert_eq!(response.status(), 404);

    handle.abort();
}

#[tokio::test]
async fn schedule_event_and_shift_flow() {
    let (base_url, handle) = spawn_mock_server().await;
    let client = reqwest::Client::new();

    approve_email(&client, &base_url, "boss@venue.test").await;
    let manager = register_user(&client, &base_url, "boss@venue.test").await;
    let manager_id = manager["id"].as_i64().expect("id");

    // Unknown creator: 404
    let response = client
        .post(format!("{}/api/v1/schedules", base_url))
        .json(&json!({ "week_number": 12, "month": "March", "year": 2026, "created_by": 999 }))
        .send()
        .await
        .expect("schedule with bad creator");
    assert_eq!(response.status(), 404);

    let response = client
        .post(format!("{}/api/v1/schedules", base_url))
        .json(&json!({
            "week_number": 12,
            "month": "March",
            "year": 2026,
            "created_by": manager_id
        }))
        .send()
        .await
        .expect("create schedule");
    assert_eq!(response.status(), 201);
    let schedule: Value = response.json().await.expect("schedule json");
    let schedule_id = schedule["id"].as_i64().expect("id");

    // Weekday out of range: validation error
    let response = client
        .post(format!("{}/api/v1/events", base_url))
        .json(&json!({ "name": "Concert", "schedule_id": schedule_id, "day": 9 }))
        .send()
        .await
        .expect("bad event");
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/v1/events", base_url))
        .json(&json!({
            "name": "Concert",
            "color_code": "#ff0000",
            "schedule_id": schedule_id,
            "day": 5
        }))
        .send()
        .await
        .expect("create event");
    assert_eq!(response.status(), 201);
    let event: Value = response.json().await.expect("event json");

    // Shift ending before it starts: validation error
    let response = client
        .post(format!("{}/api/v1/shifts", base_url))
        .json(&json!({
            "employee_id": manager_id,
            "schedule_id": schedule_id,
            "day": 5,
            "start_time": "2026-03-20T18:00:00Z",
            "end_time": "2026-03-20T17:00:00Z"
        }))
        .send()
        .await
        .expect("bad shift");
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/v1/shifts", base_url))
        .json(&json!({
            "employee_id": manager_id,
            "schedule_id": schedule_id,
            "day": 5,
            "start_time": "2026-03-20T18:00:00Z",
            "end_time": "2026-03-21T02:00:00Z",
            "event_id": event["id"]
        }))
        .send()
        .await
        .expect("create shift");
    assert_eq!(response.status(), 201);
    let shift: Value = response.json().await.expect("shift json");

    let response = client
        .get(format!("{}/api/v1/schedules/{}/events", base_url, schedule_id))
        .send()
        .await
        .expect("list events");
    let body: Value = response.json().await.expect("events json");
    assert_eq!(body["total"], 1);

    let response = client
        .get(format!("{}/api/v1/schedules/{}/shifts", base_url, schedule_id))
        .send()
        .await
        .expect("list shifts");
    let body: Value = response.json().await.expect("shifts json");
    assert_eq!(body["total"], 1);

    let response = client
        .delete(format!("{}/api/v1/shifts/{}", base_url, shift["id"].as_i64().unwrap()))
        .send()
        .await
        .expect("delete shift");
    assert_eq!(response.status(), 204);

    handle.abort();
}

#[tokio::test]
async fn time_log_clock_in_and_out() {
    let (base_url, handle) = spawn_mock_server().await;
    let client = reqwest::Client::new();

    approve_email(&client, &base_url, "worker@venue.test").await;
    let worker = register_user(&client, &base_url, "worker@venue.test").await;
    let worker_id = worker["id"].as_i64().expect("id");

    let response = client
        .post(format!("{}/api/v1/time-logs", base_url))
        .json(&json!({ "employee_id": worker_id, "late": true }))
        .send()
        .await
        .expect("clock in");
    assert_eq!(response.status(), 201);
    let log: Value = response.json().await.expect("log json");
    let log_id = log["id"].as_i64().expect("id");
    assert_eq!(log["late"], true);
    assert!(log.get("clock_out").is_none());

    let response = client
        .post(format!("{}/api/v1/time-logs/{}/clock-out", base_url, log_id))
        .json(&json!({ "break_minutes": 30, "overtime": true }))
        .send()
        .await
        .expect("clock out");
    assert_eq!(response.status(), 200);
    let closed: Value = response.json().await.expect("closed json");
    assert_eq!(closed["break_minutes"], 30);
    assert_eq!(closed["overtime"], true);
    assert!(closed.get("clock_out").is_some());

    // Second clock-out is a conflict
    let response = client
        .post(format!("{}/api/v1/time-logs/{}/clock-out", base_url, log_id))
        .json(&json!({}))
        .send()
        .await
        .expect("double clock out");
    assert_eq!(response.status(), 409);

    // Missing log is a 404
    let response = client
        .post(format!("{}/api/v1/time-logs/9999/clock-out", base_url))
        .json(&json!({}))
        .send()
        .await
        .expect("clock out missing");
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/api/v1/users/{}/time-logs", base_url, worker_id))
        .send()
        .await
        .expect("list logs");
    let body: Value = response.json().await.expect("logs json");
    assert_eq!(body["total"], 1);

    handle.abort();
}

#[tokio::test]
async fn sqlite_backed_wiring_round_trips_credentials() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("shiftboard.db");

    let mut config = test_config();
    config.database_path = db_path.to_string_lossy().into_owned();

    let server = Server::new(config.clone()).await.expect("server");
    let base_url = format!("http://{}", config.bind_addr);
    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    wait_for_health(&base_url).await;

    let client = reqwest::Client::new();
    approve_email(&client, &base_url, "ana@venue.test").await;
    register_user(&client, &base_url, "ana@venue.test").await;

    let response = client
        .post(format!("{}/api/v1/login", base_url))
        .json(&json!({ "email": "ana@venue.test", "password": "hunter2" }))
        .send()
        .await
        .expect("login");
    assert_eq!(response.status(), 200);

    handle.abort();
}
