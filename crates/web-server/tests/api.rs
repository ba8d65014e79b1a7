use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use database::InMemoryRepository;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

type App = NormalizePath<Router>;

fn setup() -> (App, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    (web_server::app(repo.clone()), repo)
}

async fn send(app: &App, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &App, title: &str, description: &str, category: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/questions",
        Some(json!({ "title": title, "description": description, "category": category })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_endpoint_returns_fixed_string() {
    let (app, _) = setup();
    let (status, body) = send(&app, "GET", "/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Server API is working 🚀"));
}

#[tokio::test]
async fn question_and_answer_walkthrough() {
    let (app, _) = setup();

    let (status, body) = send(
        &app,
        "POST",
        "/questions",
        Some(json!({ "title": "Q1", "description": "D1", "category": "C1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Question created successfully." }));

    let (status, body) = send(&app, "GET", "/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Q1");
    assert_eq!(data[0]["description"], "D1");
    assert_eq!(data[0]["category"], "C1");
    assert!(data[0]["created_at"].is_string());
    assert!(data[0]["updated_at"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/questions/1/answers",
        Some(json!({ "content": "ok" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/questions/1/answers", None).await;
    assert_eq!(status, StatusCode::OK);
    let answers = body["data"].as_array().unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0]["content"], "ok");
    assert_eq!(answers[0]["question_id"], 1);
}

#[tokio::test]
async fn create_without_required_field_is_400_and_stores_nothing() {
    let (app, repo) = setup();
    let (status, body) = send(
        &app,
        "POST",
        "/questions",
        Some(json!({ "title": "Q1", "category": "C1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing or invalid request data");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("null value in column \"description\"")
    );
    assert!(repo.questions().await.is_empty());
}

#[tokio::test]
async fn malformed_json_is_400_in_api_shape() {
    let (app, _) = setup();
    let request = Request::builder()
        .method("POST")
        .uri("/questions")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Missing or invalid request data");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_without_filters_returns_every_question_once() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;
    create(&app, "Q2", "D2", "C2").await;
    create(&app, "Q3", "D3", "C1").await;

    let (status, body) = send(&app, "GET", "/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "OK: Successfully retrieved the list of questions."
    );

    let mut titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["title"].as_str().unwrap())
        .collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["Q1", "Q2", "Q3"]);
}

#[tokio::test]
async fn list_on_empty_table_is_200_with_empty_array() {
    let (app, _) = setup();
    let (status, body) = send(&app, "GET", "/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn list_filters_match_exactly_and_conjunctively() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;
    create(&app, "Q1", "D2", "C2").await;
    create(&app, "Q2", "D3", "C1").await;

    let (_, body) = send(&app, "GET", "/questions?title=Q1&category=C1", None).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["description"], "D1");

    let (_, body) = send(&app, "GET", "/questions?category=C1", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/questions?title=q1", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn empty_filter_values_behave_like_no_filters() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;
    create(&app, "Q2", "D2", "C2").await;

    let (_, unfiltered) = send(&app, "GET", "/questions", None).await;
    let (_, blank) = send(&app, "GET", "/questions?title=&category=", None).await;
    assert_eq!(unfiltered["data"], blank["data"]);
    assert_eq!(blank["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_by_id() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;

    let (status, body) = send(&app, "GET", "/questions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully retrieved the questions.");
    assert_eq!(body["data"][0]["id"], 1);
    assert_eq!(body["data"][0]["title"], "Q1");

    let (status, body) = send(&app, "GET", "/questions/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Question not found" }));
}

#[tokio::test]
async fn non_numeric_id_is_rejected_by_the_store() {
    let (app, _) = setup();
    let (status, body) = send(&app, "GET", "/questions/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Could not find server");
    assert_eq!(
        body["error"],
        "invalid input syntax for type integer: \"abc\""
    );
}

#[tokio::test]
async fn update_existing_question_changes_updated_at_only() {
    let (app, repo) = setup();
    create(&app, "Q1", "D1", "C1").await;
    let before = repo.questions().await[0].clone();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/questions/1",
        Some(json!({ "title": "Q1b", "description": "D1b", "category": "C1b" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Successfully updated the question." }));

    let after = repo.questions().await[0].clone();
    assert_eq!(after.title, "Q1b");
    assert_eq!(after.description, "D1b");
    assert_eq!(after.category, "C1b");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn update_missing_question_is_404_without_mutation() {
    let (app, repo) = setup();
    create(&app, "Q1", "D1", "C1").await;
    let before = repo.questions().await;

    let (status, body) = send(
        &app,
        "PUT",
        "/questions/42",
        Some(json!({ "title": "x", "description": "y", "category": "z" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Question not found." }));
    assert_eq!(repo.questions().await, before);
}

#[tokio::test]
async fn partial_update_nulls_columns_and_is_rejected() {
    let (app, repo) = setup();
    create(&app, "Q1", "D1", "C1").await;

    let (status, body) = send(&app, "PUT", "/questions/1", Some(json!({ "title": "only" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing or invalid request data.");
    assert_eq!(repo.questions().await[0].title, "Q1");
}

#[tokio::test]
async fn delete_removes_question() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;

    let (status, body) = send(&app, "DELETE", "/questions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Successfully deleted the question." }));

    let (status, _) = send(&app, "GET", "/questions/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/questions/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Question not found." }));
}

#[tokio::test]
async fn answer_length_limit() {
    let (app, repo) = setup();
    create(&app, "Q1", "D1", "C1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/questions/1/answers",
        Some(json!({ "content": "a".repeat(301) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Answer content must not exceed 300 characters."
    );
    assert!(repo.answers().await.is_empty());

    let (status, body) = send(
        &app,
        "POST",
        "/questions/1/answers",
        Some(json!({ "content": "a".repeat(300) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Answer created successfully." }));
    assert_eq!(repo.answers().await.len(), 1);
}

#[tokio::test]
async fn answer_without_content_is_400() {
    let (app, repo) = setup();
    create(&app, "Q1", "D1", "C1").await;

    let (status, body) = send(&app, "POST", "/questions/1/answers", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing or invalid request data");
    assert_eq!(body["error"], "content is required");
    assert!(repo.answers().await.is_empty());
}

#[tokio::test]
async fn answers_list_is_scoped_to_question() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;
    create(&app, "Q2", "D2", "C2").await;

    for (question, content) in [(1, "a1"), (2, "b1"), (1, "a2")] {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/questions/{question}/answers"),
            Some(json!({ "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/questions/1/answers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully retrieved the answers.");
    let contents: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["a1", "a2"]);
}

#[tokio::test]
async fn answers_list_is_404_when_empty_or_question_missing() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;

    let (status, body) = send(&app, "GET", "/questions/1/answers", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Answers not found" }));

    let (status, _) = send(&app, "GET", "/questions/77/answers", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _) = setup();
    let (status, _) = send(&app, "GET", "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unregistered_method_on_known_path_is_404() {
    let (app, repo) = setup();
    create(&app, "Q1", "D1", "C1").await;

    for (method, uri) in [
        ("PATCH", "/questions/1"),
        ("PUT", "/questions"),
        ("DELETE", "/questions"),
        ("DELETE", "/questions/1/answers"),
        ("POST", "/test"),
    ] {
        let (status, _) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }
    assert_eq!(repo.questions().await.len(), 1);
}

#[tokio::test]
async fn malformed_query_string_is_400_in_api_shape() {
    let (app, _) = setup();
    let (status, body) = send(&app, "GET", "/questions?title=a&title=b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing or invalid request data");
    assert!(body["error"].as_str().unwrap().contains("duplicate field"));
}

#[tokio::test]
async fn trailing_slash_routes_to_the_same_handler() {
    let (app, _) = setup();
    create(&app, "Q1", "D1", "C1").await;

    let (status, body) = send(&app, "GET", "/questions/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/questions/1/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], "Q1");

    let (status, _) = send(
        &app,
        "POST",
        "/questions/1/answers/",
        Some(json!({ "content": "ok" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}
