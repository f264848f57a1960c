use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use cpt_app::{AppError, HttpBackend, LinkBackend, ProblemBackend, Session};
use cpt_store::{ProblemId, Source};
use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::common::{at, draft};

/// Minimal stand-in for the problem store API
#[derive(Clone, Default)]
struct FakeStore {
    problems: Arc<Mutex<Vec<Value>>>,
    cache_headers: Arc<Mutex<Vec<String>>>,
}

async fn list_problems(State(store): State<FakeStore>, headers: HeaderMap) -> Json<Value> {
    let cache = headers
        .get(header::CACHE_CONTROL)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    store.cache_headers.lock().unwrap().push(cache);
    Json(Value::Array(store.problems.lock().unwrap().clone()))
}

async fn create_problem(State(store): State<FakeStore>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut problems = store.problems.lock().unwrap();
    body["_id"] = json!(format!("p{}", problems.len() + 1));
    body["addedAt"] = json!("2024-03-01T08:00:00.000Z");
    problems.push(body.clone());
    Json(body)
}

async fn update_problem(
    State(store): State<FakeStore>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> impl IntoResponse {
    let mut problems = store.problems.lock().unwrap();
    let Some(stored) = problems.iter_mut().find(|p| p["_id"] == json!(id)) else {
        return (StatusCode::NOT_FOUND, "Problem not found").into_response();
    };
    // The store keys documents by `_id`
    if let Some(fields) = body.as_object_mut() {
        fields.remove("id");
    }
    body["_id"] = json!(id);
    *stored = body.clone();
    Json(body).into_response()
}

async fn delete_problem(State(store): State<FakeStore>, Path(id): Path<String>) -> StatusCode {
    let mut problems = store.problems.lock().unwrap();
    let before = problems.len();
    problems.retain(|p| p["_id"] != json!(id));
    if problems.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn bulk_create() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, "problem 2: name is required")
}

async fn list_links() -> Json<Value> {
    Json(json!([
        { "_id": "l1", "name": "Codeforces", "url": "https://codeforces.com" },
        { "_id": "l2", "name": "AtCoder", "url": "https://atcoder.jp", "logoSvg": "<svg/>" }
    ]))
}

async fn spawn_store(store: FakeStore) -> String {
    let app = Router::new()
        .route("/api/problems", get(list_problems).post(create_problem))
        .route("/api/problems/bulk", post(bulk_create))
        .route("/api/problems/{id}", put(update_problem).delete(delete_problem))
        .route("/api/links", get(list_links))
        .with_state(store);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move { axum::serve(listener, app).await });

    format!("http://{addr}/api/")
}

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::with_client(Client::new(), base_url)
}

#[tokio::test]
async fn test_list_accepts_store_quirks_and_bypasses_cache() {
    let store = FakeStore::default();
    store.problems.lock().unwrap().push(json!({
        "_id": "65f0c2",
        "name": "Two Sum",
        "url": "https://leetcode.com/problems/two-sum",
        "source": "LeetCode",
        "difficulty": "Easy",
        "rating": null,
        "addedAt": "2024-02-01T10:00:00.000Z",
        "revisionLevel": null,
        "nextRevisionDate": "2024-02-03T00:00:00.000Z"
    }));
    let base_url = spawn_store(store.clone()).await;

    let problems = backend(&base_url).list_problems().await.unwrap();

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].id, ProblemId::new("65f0c2"));
    assert_eq!(problems[0].source, Source::LeetCode);
    assert_eq!(problems[0].revision_level, 0);
    assert_eq!(
        problems[0].next_revision_date,
        NaiveDate::from_ymd_opt(2024, 2, 3)
    );
    assert_eq!(*store.cache_headers.lock().unwrap(), vec!["no-cache"]);
}

#[tokio::test]
async fn test_session_round_trip_over_http() {
    let store = FakeStore::default();
    let base_url = spawn_store(store.clone()).await;
    let session = Session::new(backend(&base_url));
    session.refresh().await.unwrap();
    assert_eq!(session.links().await.len(), 2);

    let created = session
        .add_problem_at(draft("Two Sum"), at("2024-03-01T08:00:00Z"))
        .await
        .unwrap();
    assert_eq!(created.id, ProblemId::new("p1"));
    assert_eq!(created.next_revision_date, NaiveDate::from_ymd_opt(2024, 3, 3));

    let revised = session
        .mark_revised_at(&created.id, at("2024-03-03T08:00:00Z"))
        .await
        .unwrap();
    assert_eq!(revised.revision_level, 1);
    assert_eq!(store.problems.lock().unwrap()[0]["revisionLevel"], json!(1));
    assert_eq!(
        store.problems.lock().unwrap()[0]["nextRevisionDate"],
        json!("2024-03-06")
    );

    session.delete_problem(&created.id).await.unwrap();
    assert!(session.problems().await.is_empty());
    assert!(store.problems.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_error_statuses_are_reported() {
    let base_url = spawn_store(FakeStore::default()).await;
    let backend = backend(&base_url);

    let result = backend.delete_problem(&ProblemId::new("missing")).await;
    assert!(matches!(result, Err(AppError::Status { status: 404, .. })));

    let record = json!({ "name": "A" }).as_object().unwrap().clone();
    let Err(AppError::Status { status, message }) = backend.create_problems(&[record]).await
    else {
        panic!("expected a status error");
    };
    assert_eq!(status, 400);
    assert_eq!(message, "problem 2: name is required");
}

#[tokio::test]
async fn test_quick_links_are_listed() {
    let base_url = spawn_store(FakeStore::default()).await;

    let links = backend(&base_url).list_links().await.unwrap();

    assert_eq!(links[0].name, "Codeforces");
    assert_eq!(links[0].logo_svg, None);
    assert_eq!(links[1].logo_svg.as_deref(), Some("<svg/>"));
}

#[tokio::test]
async fn test_unreachable_store_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = backend(&format!("http://{addr}/api"))
        .list_problems()
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert!(err.is_retryable());
}
