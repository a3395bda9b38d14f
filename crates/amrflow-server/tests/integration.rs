use axum::http::StatusCode;
use http_body_util::BodyExt;
use tower::ServiceExt;

use amrflow_server::store::Store;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a request with a JSON body via `oneshot` and return (status, parsed
/// JSON body).
async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn valid_task_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Dock run",
        "description": "move, latch, leave",
        "actions": [
            {"id": "action-1", "type": "MOVE", "config": {"location": "Shipping Dock"}},
            {"id": "action-2", "type": "LATCH", "config": {}},
            {"id": "action-3", "type": "HORN", "config": {"horn": "caution", "repetitions": 2}}
        ]
    })
}

/// Create a task and return its id.
async fn create_task(store: &Store) -> String {
    let app = amrflow_server::build_router(store.clone());
    let (status, json) = send_json(app, "POST", "/api/tasks", valid_task_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

/// Create an instance of the given task and return its id.
async fn create_instance(store: &Store, task_id: &str) -> String {
    let app = amrflow_server::build_router(store.clone());
    let (status, json) = send_json(
        app,
        "POST",
        "/api/instances",
        serde_json::json!({ "task_id": task_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_list_tasks() {
    let store = Store::new();
    let id = create_task(&store).await;

    let app = amrflow_server::build_router(store.clone());
    let (status, json) = get(app, "/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
    let tasks = json.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id.as_str());
    assert_eq!(tasks[0]["name"], "Dock run");
    assert_eq!(tasks[0]["actions"][0]["type"], "MOVE");
}

#[tokio::test]
async fn create_task_rejects_invalid_sequence() {
    let store = Store::new();
    let app = amrflow_server::build_router(store.clone());

    let body = serde_json::json!({
        "name": "Broken",
        "description": "",
        "actions": [
            {"id": "action-1", "type": "MOVE", "config": {}}
        ]
    });
    let (status, json) = send_json(app, "POST", "/api/tasks", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("location"));
}

#[tokio::test]
async fn create_task_rejects_empty_sequence() {
    let store = Store::new();
    let app = amrflow_server::build_router(store.clone());

    let body = serde_json::json!({ "name": "Empty", "description": "", "actions": [] });
    let (status, _) = send_json(app, "POST", "/api/tasks", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_task_and_missing_task_404() {
    let store = Store::new();
    let id = create_task(&store).await;

    let app = amrflow_server::build_router(store.clone());
    let (status, _) = send_json(
        app,
        "DELETE",
        &format!("/api/tasks/{id}"),
        serde_json::Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = amrflow_server::build_router(store.clone());
    let (status, _) = send_json(
        app,
        "DELETE",
        &format!("/api/tasks/{id}"),
        serde_json::Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_instance_is_queued_with_embedded_task() {
    let store = Store::new();
    let task_id = create_task(&store).await;

    let app = amrflow_server::build_router(store.clone());
    let (status, json) = send_json(
        app,
        "POST",
        "/api/instances",
        serde_json::json!({ "task_id": task_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "Queued");
    assert_eq!(json["current_action_index"], 0);
    assert_eq!(json["task"]["name"], "Dock run");
}

#[tokio::test]
async fn instance_of_unknown_task_404() {
    let store = Store::new();
    let app = amrflow_server::build_router(store);
    let (status, _) = send_json(
        app,
        "POST",
        "/api/instances",
        serde_json::json!({ "task_id": "missing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn start_pause_cancel_lifecycle() {
    let store = Store::new();
    let task_id = create_task(&store).await;
    let instance_id = create_instance(&store, &task_id).await;

    let app = amrflow_server::build_router(store.clone());
    let (status, json) = send_json(
        app,
        "PUT",
        &format!("/api/instances/{instance_id}/status"),
        serde_json::json!({ "status": "In Progress" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "In Progress");

    let app = amrflow_server::build_router(store.clone());
    let (status, json) = send_json(
        app,
        "PUT",
        &format!("/api/instances/{instance_id}/status"),
        serde_json::json!({ "status": "Paused" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Paused");

    let app = amrflow_server::build_router(store.clone());
    let (status, json) = send_json(
        app,
        "POST",
        &format!("/api/instances/{instance_id}/cancel"),
        serde_json::Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Cancelled");

    let app = amrflow_server::build_router(store.clone());
    let (status, json) = get(app, &format!("/api/instances/{instance_id}/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Cancelled");
}

#[tokio::test]
async fn status_of_unknown_instance_404() {
    let store = Store::new();
    let app = amrflow_server::build_router(store);
    let (status, _) = get(app, "/api/instances/missing/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_instances_oldest_first() {
    let store = Store::new();
    let task_id = create_task(&store).await;
    let first = create_instance(&store, &task_id).await;
    let second = create_instance(&store, &task_id).await;

    let app = amrflow_server::build_router(store.clone());
    let (status, json) = get(app, "/api/instances").await;
    assert_eq!(status, StatusCode::OK);
    let instances = json.as_array().unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0]["id"], first.as_str());
    assert_eq!(instances[1]["id"], second.as_str());
}
