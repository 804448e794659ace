//! Web form and JSON endpoint.

mod common;

use axum::http::StatusCode;
use axum_test_helper::TestClient;
use common::pipeline_replying;
use serde_json::json;
use std::sync::Arc;
use talkdb::server::router;

fn client_replying(reply: &str) -> (tempfile::TempDir, TestClient) {
    let (dir, _llm, pipeline) = pipeline_replying(reply);
    (dir, TestClient::new(router(Arc::new(pipeline))))
}

#[tokio::test]
async fn test_index_shows_empty_form() {
    let (_dir, client) = client_replying("SELECT 1");

    let res = client.get("/").send().await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.text().await;
    assert!(body.contains("<h1>Talk to your Database!</h1>"));
    assert!(body.contains("name=\"question\""));
    assert!(!body.contains("Retrieving results"));
}

#[tokio::test]
async fn test_form_submission_lists_rows() {
    let (_dir, client) =
        client_replying("SELECT NAME, MARKS FROM STUDENT WHERE COURSE='DEVOPS' ORDER BY MARKS DESC;");

    let res = client
        .post("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("question=Who+studies+DEVOPS%3F")
        .send()
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.text().await;
    assert!(body.contains("Retrieving results from the database for the query:"));
    assert!(body.contains("<p>(&#39;Vikash&#39;, 50)</p>"));
    assert!(body.contains("<p>(&#39;Dipesh&#39;, 35)</p>"));
    assert!(body.contains("value=\"Who studies DEVOPS?\""));
}

#[tokio::test]
async fn test_form_submission_shows_error() {
    let (_dir, client) = client_replying("```SELECT * FROM STUDENT;```");

    let res = client
        .post("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("question=everyone")
        .send()
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.text().await;
    assert!(body.contains("<div class=\"error\">Error: "));
    assert!(!body.contains("Retrieving results"));
}

#[tokio::test]
async fn test_api_ask_returns_rows() {
    let (_dir, client) = client_replying("SELECT COUNT(*) FROM STUDENT;");

    let res = client
        .post("/api/ask")
        .header("content-type", "application/json")
        .body(json!({"question": "How many students?"}).to_string())
        .send()
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&res.text().await).unwrap();
    assert_eq!(body["query"], "SELECT COUNT(*) FROM STUDENT;");
    assert_eq!(body["columns"], json!(["COUNT(*)"]));
    assert_eq!(body["rows"], json!([[5]]));
}

#[tokio::test]
async fn test_api_ask_execution_error() {
    let (_dir, client) = client_replying("");

    let res = client
        .post("/api/ask")
        .header("content-type", "application/json")
        .body(json!({"question": "anything"}).to_string())
        .send()
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = serde_json::from_str(&res.text().await).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Error: "));
}

#[tokio::test]
async fn test_health() {
    let (_dir, client) = client_replying("SELECT 1");
    let res = client.get("/health").send().await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await, "ok");
}
