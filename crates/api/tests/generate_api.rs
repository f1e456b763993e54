//! Integration tests for the `/generate-image` endpoint, backed by an
//! in-process stub of the Leonardo API.

mod common;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{body_json, multipart_body, multipart_request};
use serde_json::{json, Value};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Stub Leonardo server
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct StubState {
    base_url: String,
    omit_init_id: bool,
}

async fn init_image(State(state): State<StubState>) -> Json<Value> {
    let mut slot = json!({
        "url": format!("{}/upload", state.base_url),
        "fields": {"key": "uploads/img.png"},
        "id": "img-1"
    });
    if state.omit_init_id {
        slot.as_object_mut().unwrap().remove("id");
    }
    Json(json!({ "uploadInitImage": slot }))
}

async fn upload() -> StatusCode {
    StatusCode::OK
}

async fn create_generation(Json(body): Json<Value>) -> Json<Value> {
    let id = if body.get("controlnets").is_some() {
        "combine-job"
    } else {
        "first-job"
    };
    Json(json!({"sdGenerationJob": {"generationId": id}}))
}

async fn get_generation(Path(id): Path<String>) -> Json<Value> {
    let images = if id == "combine-job" {
        json!([
            {"id": "c-1", "url": "urlA"},
            {"id": "c-2", "url": "urlB"}
        ])
    } else {
        json!([{"id": "out-1", "url": "https://cdn.example/out-1.png"}])
    };
    Json(json!({"generations_by_pk": {"generated_images": images}}))
}

/// Bind the stub to port 0 and serve it in the background.
async fn spawn_stub(omit_init_id: bool) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let state = StubState {
        base_url: base_url.clone(),
        omit_init_id,
    };
    let app = Router::new()
        .route("/init-image", post(init_image))
        .route("/upload", post(upload))
        .route("/generations", post(create_generation))
        .route("/generations/{id}", get(get_generation))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base_url
}

const BOUNDARY: &str = "test-boundary-7MA4YWxk";

fn generate_request(parts: &[common::MultipartPart<'_>]) -> Request<Body> {
    multipart_request("/generate-image", BOUNDARY, multipart_body(BOUNDARY, parts))
}

// ---------------------------------------------------------------------------
// Test: happy path returns the combined URLs with status 200
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_image_returns_combined_urls() {
    let base = spawn_stub(false).await;
    let app = common::build_test_app(common::test_workflow(&base));

    let request = generate_request(&[
        ("image", Some("bike.png"), b"fake image bytes"),
        ("prompt", None, b"a red bicycle"),
        ("num_images", None, b"2"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({"combined_image_urls": ["urlA", "urlB"]}));
}

// ---------------------------------------------------------------------------
// Test: malformed init-image response maps to 500 with the exact message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_init_response_maps_to_500() {
    let base = spawn_stub(true).await;
    let app = common::build_test_app(common::test_workflow(&base));

    let request = generate_request(&[
        ("image", Some("bike.png"), b"fake image bytes"),
        ("prompt", None, b"a red bicycle"),
        ("num_images", None, b"1"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({"error": "Invalid response structure for init image upload"})
    );
}

// ---------------------------------------------------------------------------
// Test: missing multipart parts are rejected with 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_prompt_part_is_rejected() {
    let app = common::build_test_app(common::test_workflow("http://127.0.0.1:9"));

    let request = generate_request(&[
        ("image", Some("bike.png"), b"fake image bytes"),
        ("num_images", None, b"1"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("prompt"));
}

#[tokio::test]
async fn missing_image_part_is_rejected() {
    let app = common::build_test_app(common::test_workflow("http://127.0.0.1:9"));

    let request = generate_request(&[
        ("prompt", None, b"a red bicycle"),
        ("num_images", None, b"1"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image"));
}

// ---------------------------------------------------------------------------
// Test: invalid field values are rejected with 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_num_images_is_rejected() {
    let app = common::build_test_app(common::test_workflow("http://127.0.0.1:9"));

    let request = generate_request(&[
        ("image", Some("bike.png"), b"fake image bytes"),
        ("prompt", None, b"a red bicycle"),
        ("num_images", None, b"many"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("num_images"));
}

#[tokio::test]
async fn zero_num_images_is_rejected() {
    let app = common::build_test_app(common::test_workflow("http://127.0.0.1:9"));

    let request = generate_request(&[
        ("image", Some("bike.png"), b"fake image bytes"),
        ("prompt", None, b"a red bicycle"),
        ("num_images", None, b"0"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_prompt_is_rejected() {
    let app = common::build_test_app(common::test_workflow("http://127.0.0.1:9"));

    let request = generate_request(&[
        ("image", Some("bike.png"), b"fake image bytes"),
        ("prompt", None, b"   "),
        ("num_images", None, b"1"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: non-multipart content type is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_multipart_request_is_rejected() {
    let app = common::build_test_app(common::test_workflow("http://127.0.0.1:9"));

    let request = Request::builder()
        .method("POST")
        .uri("/generate-image")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}
