use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use dhadak_api::{
    AppConfig, AppState, create_router,
    storage::{DocumentStore, Sort, StoreError},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

/// A store whose backing database is unreachable.
struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn insert(&self, _c: &str, _d: Value) -> Result<(), StoreError> {
        Err(unavailable())
    }
    async fn find(&self, _c: &str, _s: Sort, _l: i64) -> Result<Vec<Value>, StoreError> {
        Err(unavailable())
    }
    async fn find_one(&self, _c: &str, _f: &str, _v: &str) -> Result<Option<Value>, StoreError> {
        Err(unavailable())
    }
    async fn first(&self, _c: &str) -> Result<Option<Value>, StoreError> {
        Err(unavailable())
    }
    async fn update(&self, _c: &str, _id: &str, _f: Value) -> Result<bool, StoreError> {
        Err(unavailable())
    }
    async fn delete(&self, _c: &str, _id: &str) -> Result<bool, StoreError> {
        Err(unavailable())
    }
    async fn replace_all(&self, _c: &str, _d: Value) -> Result<(), StoreError> {
        Err(unavailable())
    }
    async fn clear(&self, _c: &str) -> Result<u64, StoreError> {
        Err(unavailable())
    }
}

fn failing_state() -> AppState {
    AppState::new(Arc::new(UnavailableStore), AppConfig::default())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_store_failure_on_public_read_is_internal_error() {
    let router = create_router(failing_state());

    let response = router
        .oneshot(Request::builder().uri("/api/gallery").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // Database details stay in the logs.
    assert_eq!(body_json(response).await, json!({ "detail": "Internal server error" }));
}

#[tokio::test]
async fn test_store_failure_on_login_is_not_reported_as_bad_credentials() {
    let router = create_router(failing_state());

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": "admin@dhadak.example", "password": "pw" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_store_failure_on_gated_write_is_internal_error() {
    let state = failing_state();
    let token = state.tokens.issue(Uuid::new_v4(), "admin@dhadak.example").unwrap();
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/about")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "content": "new" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_gate_rejects_before_touching_store() {
    let router = create_router(failing_state());

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/team/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // 401 rather than 500: the failing store was never called.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_store_error_debug_output_keeps_the_cause() {
    let error = dhadak_api::AppError::from(unavailable());

    assert_eq!(error.to_string(), "Internal server error");
    assert!(format!("{error:?}").contains("PoolTimedOut"));
}
