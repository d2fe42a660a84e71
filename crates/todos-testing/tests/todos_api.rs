//! End-to-end tests for the todos checks
//!
//! These tests spin up an in-process todos service on an ephemeral port and
//! run the real reqwest-backed suite against it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use todos_testing::prelude::*;
use todos_testing::{CheckStatus, NewTodo};

// Simple in-memory todo store for testing
#[derive(Clone, Default)]
struct TodoStore {
    todos: Arc<Mutex<Vec<Todo>>>,
    next_id: Arc<Mutex<i64>>,
}

impl TodoStore {
    fn create(&self, title: String) -> Todo {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let todo = Todo {
            id: TodoId::Integer(*next_id),
            title,
            extra: Map::new(),
        };
        self.todos.lock().unwrap().push(todo.clone());
        todo
    }

    fn all(&self) -> Vec<Todo> {
        self.todos.lock().unwrap().clone()
    }

    fn remove(&self, id: i64) {
        self.todos
            .lock()
            .unwrap()
            .retain(|todo| todo.id != TodoId::Integer(id));
    }
}

async fn create_todo(State(store): State<TodoStore>, Json(new): Json<NewTodo>) -> (StatusCode, Json<Todo>) {
    (StatusCode::CREATED, Json(store.create(new.title)))
}

async fn list_todos(State(store): State<TodoStore>) -> Json<Vec<Todo>> {
    Json(store.all())
}

// Deleting a missing row is still a success, like a plain SQL DELETE
async fn delete_todo(State(store): State<TodoStore>, Path(id): Path<i64>) -> StatusCode {
    store.remove(id);
    StatusCode::NO_CONTENT
}

fn todos_router(store: TodoStore) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", delete(delete_todo))
        .with_state(store)
}

/// A service that gets every part of the contract slightly wrong
fn broken_router() -> Router {
    Router::new()
        .route(
            "/todos",
            get(|| async { Json(json!({"todos": []})) })
                .post(|| async { (StatusCode::OK, Json(json!({"title": "test"}))) }),
        )
        .route(
            "/todos/:id",
            delete(|| async { (StatusCode::NOT_FOUND, "no such todo") }),
        )
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(config: &SuiteConfig) -> TestClient {
    TestClient::from_config(config).unwrap()
}

#[tokio::test]
async fn test_create_list_delete_against_live_service() {
    let store = TodoStore::default();
    let base_url = spawn(todos_router(store.clone())).await;
    let config = SuiteConfig::new().with_base_url(&base_url);

    let report = SuiteRunner::todos(client_for(&config), &config).run().await;

    assert!(report.is_success(), "{}", report.render_text());
    assert_eq!(report.passed(), 3);
    assert_eq!(report.base_url, base_url);
    // The todo created by the suite was the one deleted
    assert!(store.all().is_empty());
}

#[tokio::test]
async fn test_any_title_is_echoed() {
    let store = TodoStore::default();
    let base_url = spawn(todos_router(store.clone())).await;
    let config = SuiteConfig::new()
        .with_base_url(&base_url)
        .with_title("buy milk & eggs ✓")
        .with_checks(vec![CheckKind::Create]);

    let report = SuiteRunner::todos(client_for(&config), &config).run().await;

    assert!(report.is_success(), "{}", report.render_text());
    let todos = store.all();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "buy milk & eggs ✓");
}

#[tokio::test]
async fn test_isolated_checks_delete_fallback_id() {
    let store = TodoStore::default();
    let base_url = spawn(todos_router(store.clone())).await;
    let config = SuiteConfig::new().with_base_url(&base_url).isolated(true);

    let report = SuiteRunner::todos(client_for(&config), &config).run().await;

    assert!(report.is_success(), "{}", report.render_text());
    // Fallback id 1 is also the first id this store hands out
    assert!(store.all().is_empty());
}

#[tokio::test]
async fn test_delete_alone_uses_fallback_id() {
    let base_url = spawn(todos_router(TodoStore::default())).await;
    let config = SuiteConfig::new()
        .with_base_url(&base_url)
        .with_checks(vec![CheckKind::Delete]);

    let report = SuiteRunner::todos(client_for(&config), &config).run().await;

    assert!(report.is_success(), "{}", report.render_text());
    assert_eq!(report.checks.len(), 1);
}

#[tokio::test]
async fn test_contract_violations_fail_each_check() {
    let base_url = spawn(broken_router()).await;
    let config = SuiteConfig::new().with_base_url(&base_url);

    let report = SuiteRunner::todos(client_for(&config), &config).run().await;

    assert_eq!(report.failed(), 3);

    let create = report.check("create").unwrap();
    assert_eq!(create.status, CheckStatus::Failed);
    assert!(create.message.as_deref().unwrap().contains("got 200"));

    let list = report.check("list").unwrap();
    assert!(list.message.as_deref().unwrap().contains("Expected JSON array"));

    let delete = report.check("delete").unwrap();
    let message = delete.message.as_deref().unwrap();
    assert!(message.contains("got 404"));
    assert!(message.contains("no such todo"));
}

#[tokio::test]
async fn test_unreachable_service_reports_failures() {
    // Reserve a port, then free it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = SuiteConfig::new()
        .with_base_url(format!("http://{}", addr))
        .with_timeout(Duration::from_secs(2));

    let report = SuiteRunner::todos(client_for(&config), &config).run().await;

    assert_eq!(report.checks.len(), 3);
    assert_eq!(report.failed(), 3);
    for check in &report.checks {
        assert!(check
            .message
            .as_deref()
            .unwrap()
            .contains("HTTP transport error"));
    }
}

#[tokio::test]
async fn test_client_round_trip_with_assertions() -> TestResult<()> {
    let base_url = spawn(todos_router(TodoStore::default())).await;
    let client = TestClient::with_base_url(&base_url)?;

    let created = client
        .post("/todos")
        .json(&json!({"title": "test"}))
        .send()
        .await?
        .assert_status(201)?
        .assert_json_contains(json!({"title": "test"}))?
        .json()?;
    let id = TodoId::from_json(&created["id"]).unwrap();

    client
        .get("/todos")
        .send()
        .await?
        .assert_success()?
        .assert_json_contains(json!([{"title": "test"}]))?;

    client
        .delete(format!("/todos/{}", id))
        .send()
        .await?
        .assert_status(204)?
        .assert_empty_body()?;

    let remaining: Value = client.get("/todos").send().await?.json()?;
    assert_eq!(remaining, json!([]));
    Ok(())
}
