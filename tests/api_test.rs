//! End-to-end checks of the HTTP surface, driven through the router with
//! `tower::ServiceExt::oneshot`

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use hackathon_portal::config::{Config, Environment};
use hackathon_portal::db;
use hackathon_portal::infrastructure::AppState;
use hackathon_portal::server::build_router;
use hackathon_portal::services::admin_user_service;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN: &str = "organizer";
const PASSWORD: &str = "correct-horse";

struct TestApp {
    router: Router,
    _dir: TempDir,
}

async fn setup_app_with(configure: impl FnOnce(&mut Config), with_db: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config {
        local_store_path: dir.path().join("registrations.local.json"),
        admin_username: ADMIN.to_string(),
        admin_password: Some(PASSWORD.to_string()),
        jwt_secret: "test-secret".to_string(),
        ..Default::default()
    };
    configure(&mut config);

    let db = if with_db {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");
        admin_user_service::ensure_bootstrap_admin(&db, &config)
            .await
            .unwrap();
        Some(db)
    } else {
        None
    };

    let state = AppState::new(config, db).unwrap();
    TestApp {
        router: build_router(state),
        _dir: dir,
    }
}

async fn setup_app() -> TestApp {
    setup_app_with(|_| {}, true).await
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": ADMIN, "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

fn registration_body(team: &str, dept: &str) -> Value {
    json!({
        "team_name": team,
        "leader_name": "Asha Rao",
        "email": "asha@example.com",
        "mobile": "9876543210",
        "college": "City Engineering College",
        "leader_dept": dept,
        "member2_name": "Ravi Kumar",
        "member2_email": "ravi@example.com",
        "member2_dept": dept
    })
}

// ============================================================================
// Health and routing
// ============================================================================

#[tokio::test]
async fn health_check_is_ok() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/api/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_paths_get_json_404() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/api/definitely-not-here", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Endpoint not found");
    assert_eq!(body["path"], "/api/definitely-not-here");
}

#[tokio::test]
async fn data_health_without_database_is_unavailable() {
    let app = setup_app_with(|_| {}, false).await;

    let (status, body) = send(&app, get("/api/data/health", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");

    let (status, _) = send(&app, get("/api/statistics", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_then_find_by_search() {
    let app = setup_app().await;

    let (status, created) = send(
        &app,
        json_request("POST", "/api/register", None, registration_body("Byte Busters", "AIML")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["team_name"], "Byte Busters");
    assert_eq!(created["status"], "pending");

    let (status, found) = send(&app, get("/api/registrations?search=byte&dept=All", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], created["id"]);

    let (_, none) = send(&app, get("/api/registrations?dept=CS", None)).await;
    assert!(none.as_array().unwrap().is_empty());

    let uri = format!("/api/registrations/{}", created["id"]);
    let (status, one) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["email"], "asha@example.com");

    let (status, _) = send(&app, get("/api/registrations/424242", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_registration_is_a_400() {
    let app = setup_app().await;
    let mut body = registration_body("B", "AIML");
    body["email"] = json!("not-an-email");

    let (status, error) = send(&app, json_request("POST", "/api/register", None, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["status"], "error");
    let detail = error["error"].as_str().unwrap();
    assert!(detail.contains("team_name"));
    assert!(detail.contains("email"));
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn admin_routes_require_a_token() {
    let app = setup_app().await;

    let (status, _) = send(&app, get("/api/registrations/export", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("PATCH", "/api/registrations/1/status", Some("garbage"), json!({ "status": "selected" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": ADMIN, "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Login failed");
}

#[tokio::test]
async fn admin_review_flow() {
    let app = setup_app().await;
    let token = login(&app).await;

    let (_, me) = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(me["username"], ADMIN);
    assert!(me.get("password_hash").is_none());

    let (_, created) = send(
        &app,
        json_request("POST", "/api/register", None, registration_body("Byte Busters", "AIML")),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let status_uri = format!("/api/registrations/{}/status", id);
    let (status, updated) = send(
        &app,
        json_request("PATCH", &status_uri, Some(&token), json!({ "status": "selected" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "selected");

    let (_, stats) = send(&app, get("/api/statistics", None)).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["selected"], 1);
    assert_eq!(stats["byDept"]["AIML"], 1);

    let (status, logs) = send(&app, get("/api/audit-logs?table=registrations", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs.as_array().unwrap().len(), 1);

    let (status, deleted) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/registrations/{}", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Registration deleted successfully");
}

#[tokio::test]
async fn deactivated_admin_token_stops_working() {
    let app = setup_app().await;
    let super_token = login(&app).await;

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/api/admins",
            Some(&super_token),
            json!({ "username": "reviewer", "email": "reviewer@example.com", "password": "review-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
    let reviewer_id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "reviewer", "password": "review-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reviewer_token = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, get("/api/registrations/export", Some(&reviewer_token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/admins/{}", reviewer_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", super_token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/registrations/export", Some(&reviewer_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Account is inactive or no longer exists");

    let (status, _) = send(&app, get("/api/registrations/export", Some(&super_token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn csv_export_is_an_attachment() {
    let app = setup_app().await;
    let token = login(&app).await;

    send(
        &app,
        json_request("POST", "/api/register", None, registration_body("Byte Busters", "AIML")),
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/registrations/export?dept=AIML", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("hackathon_registrations.csv")
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("\"Byte Busters\""));
    assert!(lines[1].contains("\"N/A (N/A)\""));
}

#[tokio::test]
async fn destructive_data_routes_are_refused_in_production() {
    let app = setup_app_with(|c| c.environment = Environment::Production, true).await;
    let token = login(&app).await;

    let (status, body) = send(&app, json_request("POST", "/api/data/reset", Some(&token), json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "error");

    let (status, _) = send(&app, get("/api/data/backup", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Events and FAQ
// ============================================================================

#[tokio::test]
async fn event_counter_increments() {
    let app = setup_app().await;
    let token = login(&app).await;

    let (status, event) = send(
        &app,
        json_request(
            "POST",
            "/api/events",
            Some(&token),
            json!({
                "title": "Opening Ceremony",
                "event_date": "2099-12-01",
                "event_time": "09:00",
                "status": "published"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["registered_count"], 0);

    let uri = format!("/api/events/{}/increment", event["id"]);
    let (_, bumped) = send(&app, json_request("POST", &uri, Some(&token), json!({ "by": 2 }))).await;
    assert_eq!(bumped["registered_count"], 2);

    let (_, listed) = send(&app, get("/api/events", None)).await;
    assert_eq!(listed[0]["title"], "Opening Ceremony");
}

#[tokio::test]
async fn faq_answers_from_the_table_without_a_model() {
    let app = setup_app().await;

    let (status, reply) = send(
        &app,
        json_request("POST", "/api/faq", None, json!({ "message": "What is the team size?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["answer"], "Team size is fixed to 2 members.");
    assert_eq!(reply["source"], "fallback");

    let uri = format!("/api/faq/{}", reply["conversation_id"].as_str().unwrap());
    let end = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, end).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let end_again = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, end_again).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
