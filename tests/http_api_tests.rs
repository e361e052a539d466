// Tests for the script-generation HTTP endpoint
//
// The router is exercised in-process with tower's oneshot; the generator is
// stubbed except for the missing-credentials case, which uses the real
// OpenAI-backed generator with an empty key (it fails before any request).

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use podcast_studio::{
    create_router, AppState, GenerationError, OpenAiScriptGenerator, ScriptGenerator,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

struct CannedGenerator(String);

#[async_trait::async_trait]
impl ScriptGenerator for CannedGenerator {
    async fn generate(&self, _topic: &str, _key_points: &str) -> Result<String, GenerationError> {
        Ok(self.0.clone())
    }
}

struct FailingGenerator;

#[async_trait::async_trait]
impl ScriptGenerator for FailingGenerator {
    async fn generate(&self, _topic: &str, _key_points: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Upstream("model is on strike".to_string()))
    }
}

fn router_with(generator: Arc<dyn ScriptGenerator>) -> axum::Router {
    create_router(AppState::new(generator))
}

fn post_body(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate-script")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_valid_request_returns_script() {
    let app = router_with(Arc::new(CannedGenerator("[INTRO] Hello.".to_string())));

    let response = app
        .oneshot(post_body(json!({
            "topic": "Social media and politics",
            "keyPoints": "algorithms; misinformation risks"
        })))
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["script"], "[INTRO] Hello.");
}

#[tokio::test]
async fn test_missing_fields_return_400() {
    let app = router_with(Arc::new(CannedGenerator("unused".to_string())));

    let response = app
        .oneshot(post_body(json!({ "topic": "Only a topic" })))
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().expect("error message").len() > 0);
}

#[tokio::test]
async fn test_blank_input_returns_400() {
    let app = router_with(Arc::new(CannedGenerator("unused".to_string())));

    let response = app
        .oneshot(post_body(json!({ "topic": "   ", "keyPoints": "\n" })))
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_verb_returns_405_with_json_error() {
    let app = router_with(Arc::new(CannedGenerator("unused".to_string())));

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/generate-script")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Method not allowed.");
}

#[tokio::test]
async fn test_upstream_failure_returns_500() {
    let app = router_with(Arc::new(FailingGenerator));

    let response = app
        .oneshot(post_body(json!({
            "topic": "Social media and politics",
            "keyPoints": "algorithms; misinformation risks"
        })))
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("model is on strike"));
}

#[tokio::test]
async fn test_missing_credentials_return_500() {
    // Real generator, empty API key: fails server-side before any request
    let generator = Arc::new(OpenAiScriptGenerator::new("", "", "gpt-4o-mini"));
    let app = router_with(generator);

    let response = app
        .oneshot(post_body(json!({
            "topic": "Social media and politics",
            "keyPoints": "algorithms; misinformation risks"
        })))
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("API key"));
}

#[tokio::test]
async fn test_health_check() {
    let app = router_with(Arc::new(CannedGenerator("unused".to_string())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
}
