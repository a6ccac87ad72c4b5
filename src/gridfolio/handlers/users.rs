//! User CRUD endpoints.
//!
//! Every error body is JSON with an `error` string field; clients surface
//! that message directly, so the exact texts here are part of the API
//! contract.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::gridfolio::store::{StoreError, StoredUser, UserStore};

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<StoredUser>,
}

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug)]
enum ServiceError {
    NoBody,
    MissingFields,
    InvalidId,
    NotFound,
    Store(anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            StoreError::Backend(err) => Self::Store(err),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NoBody => (StatusCode::BAD_REQUEST, "No JSON body provided".to_string()),
            Self::MissingFields => (
                StatusCode::BAD_REQUEST,
                "Name and email are required".to_string(),
            ),
            Self::InvalidId => (
                StatusCode::BAD_REQUEST,
                "Invalid user ID format".to_string(),
            ),
            Self::NotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            Self::Store(err) => {
                error!("Failed to handle user request: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn parse_user_id(id: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(id.trim()).map_err(|_| ServiceError::InvalidId)
}

fn required_fields(payload: &UserPayload) -> Result<(&str, &str), ServiceError> {
    let name = payload.name.trim();
    let email = payload.email.trim();

    if name.is_empty() || email.is_empty() {
        return Err(ServiceError::MissingFields);
    }

    Ok((name, email))
}

pub async fn list_users(store: Extension<Arc<dyn UserStore>>) -> Response {
    match store.list().await {
        Ok(users) => (StatusCode::OK, Json(UsersResponse { users })).into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

pub async fn create_user(
    store: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<UserPayload>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return ServiceError::NoBody.into_response();
    };

    let (name, email) = match required_fields(&payload) {
        Ok(fields) => fields,
        Err(err) => return err.into_response(),
    };

    match store.create(name, email).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User created", "id": user.id })),
        )
            .into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

pub async fn update_user(
    Path(id): Path<String>,
    store: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<UserPayload>>,
) -> Response {
    let user_id = match parse_user_id(&id) {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    let Some(Json(payload)) = payload else {
        return ServiceError::NoBody.into_response();
    };

    let (name, email) = match required_fields(&payload) {
        Ok(fields) => fields,
        Err(err) => return err.into_response(),
    };

    match store.update(user_id, name, email).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "User updated successfully" })),
        )
            .into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

pub async fn delete_user(
    Path(id): Path<String>,
    store: Extension<Arc<dyn UserStore>>,
) -> Response {
    let user_id = match parse_user_id(&id) {
        Ok(user_id) => user_id,
        Err(err) => return err.into_response(),
    };

    match store.delete(user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "User deleted successfully" })),
        )
            .into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}
