//! HTTP surface tests: the full router over a migrated SQLite database.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{setup, test_config, TestContext};
use timesheet_api::api::{create_router, AppState};
use timesheet_api::domain::UserRole;

struct TestApp {
    ctx: TestContext,
    router: Router,
}

async fn app() -> TestApp {
    let ctx = setup().await;
    let state = AppState::from_config(ctx.db.clone(), test_config());
    TestApp {
        router: create_router(state),
        ctx,
    }
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn login(app: &TestApp, username: &str) -> String {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": username, "password": "secret123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &TestApp) -> String {
    app.ctx.user("admin", UserRole::Admin).await;
    login(app, "admin").await
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = app().await;

    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = app().await;
    app.ctx.user("alice", UserRole::User).await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong-password" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_user_routes_require_token() {
    let app = app().await;

    let (status, body) = send(&app, request(Method::GET, "/user/projects", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        request(Method::GET, "/user/projects", Some("not-a-jwt"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_regular_user() {
    let app = app().await;
    app.ctx.user("alice", UserRole::User).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(&app, request(Method::GET, "/admin/users", Some(&token), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_creates_users_once() {
    let app = app().await;
    let token = admin_token(&app).await;
    let payload = json!({
        "username": "jdoe",
        "password": "secret123",
        "name": "John Doe",
        "role": "user"
    });

    let (status, body) = send(
        &app,
        request(Method::POST, "/admin/users", Some(&token), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "jdoe");
    assert!(body.get("password_hash").is_none());

    let (status, body) = send(
        &app,
        request(Method::POST, "/admin/users", Some(&token), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_admin_user_validation() {
    let app = app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/admin/users",
            Some(&token),
            Some(json!({
                "username": "j.doe",
                "password": "secret123",
                "name": "John Doe",
                "role": "user"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_full_timesheet_workflow() {
    let app = app().await;
    let admin = admin_token(&app).await;

    // Admin sets up a user and a project
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/admin/users",
            Some(&admin),
            Some(json!({
                "username": "worker",
                "password": "secret123",
                "name": "Worker Bee",
                "role": "user"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, project) = send(
        &app,
        request(
            Method::POST,
            "/admin/projects",
            Some(&admin),
            Some(json!({
                "client_name": "Acme Corp",
                "project_name": "Website",
                "work_type": "Development",
                "location": "Remote"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = project["id"].as_i64().unwrap();

    let (_, users) = send(&app, request(Method::GET, "/admin/users", Some(&admin), None)).await;
    let worker_id = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "worker")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let assign = json!({ "user_id": worker_id, "project_id": project_id });
    let (status, body) = send(
        &app,
        request(Method::POST, "/admin/assign-project", Some(&admin), Some(assign.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project assigned successfully");

    let (status, body) = send(
        &app,
        request(Method::POST, "/admin/assign-project", Some(&admin), Some(assign)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project already assigned to this user");

    let worker = login(&app, "worker").await;

    let (status, projects) =
        send(&app, request(Method::GET, "/user/projects", Some(&worker), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(projects.as_array().unwrap().len(), 1);

    // Clock in and out
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/user/clock-in",
            Some(&worker),
            Some(json!({ "project_id": project_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Clocked in successfully");
    assert_eq!(body["entry"]["status"], "active");
    let entry_id = body["entry"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/user/clock-in",
            Some(&worker),
            Some(json!({ "project_id": project_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (_, active) =
        send(&app, request(Method::GET, "/user/active-entries", Some(&worker), None)).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["project_name"], "Website");

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/user/clock-out",
            Some(&worker),
            Some(json!({ "entry_id": entry_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["status"], "completed");

    // Out-of-range hours are rejected, numeric strings accepted
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/user/timesheets",
            Some(&worker),
            Some(json!({
                "project_id": project_id,
                "week_start": "2024-03-13",
                "hours": { "monday": 25 }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("monday"));

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/user/timesheets",
            Some(&worker),
            Some(json!({
                "project_id": project_id,
                "week_start": "2024-03-13",
                "hours": { "monday": "4", "tuesday": 2.5 }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Timesheet saved successfully");
    assert_eq!(body["timesheet"]["week_start"], "2024-03-10");
    assert_eq!(body["timesheet"]["total_hours"], 6.5);

    let (status, sheets) = send(
        &app,
        request(
            Method::GET,
            "/user/timesheets?week_start=2024-03-13",
            Some(&worker),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sheets.as_array().unwrap().len(), 1);
    assert_eq!(sheets[0]["week_start"], "2024-03-10");
    assert_eq!(sheets[0]["monday"], 4.0);
    assert_eq!(sheets[0]["project_name"], "Website");

    // The clocked session took under a minute, so there is nothing to fold
    let (status, report) = send(
        &app,
        request(Method::POST, "/admin/sync-time-entries", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["entries_synced"], 0);
    assert_eq!(report["timesheets_updated"], 0);

    let (status, all) = send(
        &app,
        request(
            Method::GET,
            &format!("/admin/timesheets?user_id={}", worker_id),
            Some(&admin),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["user_name"], "Worker Bee");

    // Remove, then removing again is an invalid state
    let uri = format!("/user/remove-project/{}", project_id);
    let (status, body) = send(&app, request(Method::DELETE, &uri, Some(&worker), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project removed from timesheet");

    let (status, body) = send(&app, request(Method::DELETE, &uri, Some(&worker), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_complete_project_over_http() {
    let app = app().await;
    let (user, project) = app.ctx.assigned("alice").await;
    let token = login(&app, "alice").await;

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/user/timesheets",
            Some(&token),
            Some(json!({
                "project_id": project.id,
                "week_start": "2024-03-10",
                "hours": { "friday": 7.5 }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/user/complete-project",
            Some(&token),
            Some(json!({ "project_id": project.id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_hours"], 7.5);

    // Completing again archives nothing new and reports a plain zero
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/user/complete-project",
            Some(&token),
            Some(json!({ "project_id": project.id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let repeat = body["total_hours"].as_f64().unwrap();
    assert_eq!(repeat, 0.0);
    assert!(repeat.is_sign_positive());

    let admin = admin_token(&app).await;
    let (status, completions) = send(
        &app,
        request(Method::GET, "/admin/project-completions", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completions.as_array().unwrap().len(), 2);
    assert_eq!(completions[0]["user_id"], user.id);
    assert!(completions[0]["total_hours_worked"]
        .as_f64()
        .unwrap()
        .is_sign_positive());
    assert_eq!(completions[1]["total_hours_worked"], 7.5);
}

#[tokio::test]
async fn test_path_ids_must_be_positive_integers() {
    let app = app().await;
    app.ctx.user("alice", UserRole::User).await;
    let user = login(&app, "alice").await;
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        request(Method::DELETE, "/user/remove-project/0", Some(&user), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        request(Method::DELETE, "/user/remove-project/abc", Some(&user), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        request(Method::DELETE, "/admin/projects/-3", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/admin/projects/zero",
            Some(&admin),
            Some(json!({
                "client_name": "Acme Corp",
                "project_name": "Website",
                "work_type": "Development",
                "location": "Remote"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_timesheet_listing_requires_week() {
    let app = app().await;
    app.ctx.user("alice", UserRole::User).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        request(Method::GET, "/user/timesheets", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_project_update_and_delete() {
    let app = app().await;
    let token = admin_token(&app).await;
    let project = app.ctx.project("Old Name").await;
    let uri = format!("/admin/projects/{}", project.id);
    let payload = json!({
        "client_name": "Acme Corp",
        "project_name": "New Name",
        "work_type": "Design",
        "location": "Berlin"
    });

    let (status, body) = send(
        &app,
        request(Method::PUT, &uri, Some(&token), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project_name"], "New Name");

    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, request(Method::PUT, &uri, Some(&token), Some(payload))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
