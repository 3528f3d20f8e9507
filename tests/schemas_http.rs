mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn request_schemas_are_published() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/schemas", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names = body.as_array().unwrap();
    assert_eq!(names.len(), 9);
    assert!(names.contains(&json!("propertyCreate")));

    let (status, body) = app.send("GET", "/schemas/propertyCreate", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["required"], json!(["title", "type", "price"]));

    let (status, body) = app.send("GET", "/schemas/messageUpdate.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["required"], json!(["status"]));
}

#[tokio::test]
async fn unknown_schema_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/schemas/offers", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}
