use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rollbook::config::cors::CorsConfig;
use rollbook::router::init_router;
use rollbook::state::AppState;
use rollbook_store::memory::{MemoryStudentStore, MemoryTeacherStore};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

/// Builds the full application router over fresh in-memory stores.
pub fn setup_test_app() -> Router {
    let state = AppState {
        students: Arc::new(MemoryStudentStore::new()),
        teachers: Arc::new(MemoryTeacherStore::new()),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

/// Sends one request and collects the response status and JSON body.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            builder
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[allow(dead_code)]
pub fn student_payload(student_id: i64, email: &str) -> serde_json::Value {
    json!({
        "student_id": student_id,
        "name": "John Doe",
        "address": "12 High Street",
        "email": email,
        "gender": "male",
        "date_of_birth": "2012-03-10"
    })
}

#[allow(dead_code)]
pub fn teacher_payload(teacher_id: i64, email: &str) -> serde_json::Value {
    json!({
        "teacher_id": teacher_id,
        "name": "Jane Smith",
        "email": email,
        "phone": "0123456789",
        "subject": "Mathematics"
    })
}
