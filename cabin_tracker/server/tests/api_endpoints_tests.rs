use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use cabin_tracker_server::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};
use cabin_tracker_server::web::{AppState, create_app_router};
use insta::assert_yaml_snapshot;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use testcontainers_modules::{postgres, testcontainers};
use tower::ServiceExt;

mod common;

pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
    pub app: Router,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    let app = create_app_router(Arc::new(AppState::new(db.clone())));
    Ok(TestContext { container, db, app })
}

/// Sends a request through the router and returns the status with the parsed JSON body.
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn can_create_and_fetch_cabin() {
    let state = setup().await.expect("Failed to setup test context");

    let (status, created) = send(
        &state.app,
        Method::POST,
        "/api/cabins",
        Some(json!({ "name": "Lakeview", "location": "Lake Tahoe" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Lakeview");
    assert_eq!(created["description"], Value::Null);
    assert!(created["createdAt"].is_string());

    let id = created["id"].as_str().unwrap();
    let (status, details) = send(&state.app, Method::GET, &format!("/api/cabins/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["id"], created["id"]);
    assert_eq!(details["maintenanceTasks"], json!([]));

    let (status, cabins) = send(&state.app, Method::GET, "/api/cabins", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cabins.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn can_itemise_invalid_cabin_fields() {
    let state = setup().await.expect("Failed to setup test context");

    let (status, body) = send(
        &state.app,
        Method::POST,
        "/api/cabins",
        Some(json!({ "location": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_yaml_snapshot!(body, @r"
    details:
      - field: name
        message: name is required
      - field: location
        message: location must not be empty
    error: VALIDATION_FAILED
    message: Request validation failed
    ");
}

#[tokio::test]
async fn can_reject_cabin_name_wider_than_the_column() {
    let state = setup().await.expect("Failed to setup test context");

    let (status, body) = send(
        &state.app,
        Method::POST,
        "/api/cabins",
        Some(json!({ "name": "a".repeat(256), "location": "Lake Tahoe" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["details"][0]["field"], "name");
    assert_eq!(
        body["details"][0]["message"],
        "name must be at most 255 characters"
    );

    let (_, cabins) = send(&state.app, Method::GET, "/api/cabins", None).await;
    assert_eq!(cabins, json!([]));
}

#[tokio::test]
async fn can_reject_malformed_json_body() {
    let state = setup().await.expect("Failed to setup test context");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/cabins")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = state.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn can_answer_not_found_for_unknown_ids() {
    let state = setup().await.expect("Failed to setup test context");
    let unknown = uuid::Uuid::new_v4();

    for (method, uri) in [
        (Method::GET, format!("/api/cabins/{unknown}")),
        (Method::DELETE, format!("/api/cabins/{unknown}")),
        (Method::GET, format!("/api/tasks/{unknown}")),
        (Method::DELETE, format!("/api/tasks/{unknown}")),
        (Method::GET, format!("/api/tasks/cabin/{unknown}")),
    ] {
        let (status, body) = send(&state.app, method.clone(), &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"], "NOT_FOUND", "{method} {uri}");
    }
}

#[tokio::test]
async fn can_refuse_task_for_missing_cabin() {
    let state = setup().await.expect("Failed to setup test context");
    let unknown = uuid::Uuid::new_v4();

    let (status, body) = send(
        &state.app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "cabinId": unknown, "description": "Clean gutters" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
    assert_eq!(
        body["message"],
        format!("Cabin with ID {unknown} does not exist")
    );

    let (_, tasks) = send(&state.app, Method::GET, "/api/tasks", None).await;
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn can_reject_unknown_priority() {
    let state = setup().await.expect("Failed to setup test context");
    let cabin = common::seed_cabin(&state.db, "Lakeview", "Lake Tahoe")
        .await
        .unwrap();

    let (status, body) = send(
        &state.app,
        Method::POST,
        "/api/tasks",
        Some(json!({
            "cabinId": cabin.id(),
            "description": "Clean gutters",
            "priority": "Urgent"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(
        body["details"][0]["message"],
        "priority must be one of: High, Medium, Low"
    );
}

#[tokio::test]
async fn can_manage_task_lifecycle() {
    let state = setup().await.expect("Failed to setup test context");
    let cabin = common::seed_cabin(&state.db, "Lakeview", "Lake Tahoe")
        .await
        .unwrap();

    let (status, created) = send(
        &state.app,
        Method::POST,
        "/api/tasks",
        Some(json!({
            "cabinId": cabin.id(),
            "description": "Fix the leaking roof",
            "priority": "High"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["priority"], "High");
    assert_eq!(created["status"], "Pending");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &state.app,
        Method::PATCH,
        &format!("/api/tasks/{id}"),
        Some(json!({ "status": "In Progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "In Progress");
    assert_eq!(updated["priority"], "High");
    assert_eq!(updated["description"], "Fix the leaking roof");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, tasks) = send(
        &state.app,
        Method::GET,
        &format!("/api/tasks/cabin/{}", cabin.id()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks, json!([updated]));

    let (status, body) = send(&state.app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&state.app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_summarise_cabins() {
    let state = setup().await.expect("Failed to setup test context");
    let cabin = common::seed_cabin(&state.db, "Lakeview", "Lake Tahoe")
        .await
        .unwrap();
    for (description, priority, status) in [
        ("Fix the leaking roof", TaskPriority::High, TaskStatus::Pending),
        ("Clean the chimney", TaskPriority::Medium, TaskStatus::Pending),
        ("Oil the deck", TaskPriority::Low, TaskStatus::Pending),
        ("Paint the porch", TaskPriority::Low, TaskStatus::Complete),
    ] {
        common::seed_task(&state.db, &cabin, description, priority, status)
            .await
            .unwrap();
    }

    let (status, summary) = send(&state.app, Method::GET, "/api/cabins/summary", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summary,
        json!([{
            "id": cabin.id(),
            "name": "Lakeview",
            "location": "Lake Tahoe",
            "description": null,
            "pendingHighPriority": 1,
            "pendingMediumPriority": 1,
            "pendingLowPriority": 1,
            "totalPendingTasks": 3
        }])
    );
}

#[tokio::test]
async fn can_delete_cabin_and_its_tasks() {
    let state = setup().await.expect("Failed to setup test context");
    let cabin = common::seed_cabin(&state.db, "Lakeview", "Lake Tahoe")
        .await
        .unwrap();
    let task = common::seed_task(
        &state.db,
        &cabin,
        "Service the hot tub",
        TaskPriority::Medium,
        TaskStatus::Pending,
    )
    .await
    .unwrap();

    let (status, _) = send(
        &state.app,
        Method::DELETE,
        &format!("/api/cabins/{}", cabin.id()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &state.app,
        Method::GET,
        &format!("/api/tasks/{}", task.id()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
