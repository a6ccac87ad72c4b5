use axum::response::{IntoResponse, Json};
use serde_json::json;

// axum handler for the smoke-test route
pub async fn hello() -> impl IntoResponse {
    Json(json!({ "message": "Hello from gridfolio!" }))
}
