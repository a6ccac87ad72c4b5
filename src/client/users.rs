//! Typed wrappers for the user-management endpoints. These keep endpoint
//! paths centralized; validation of user input lives in the dashboard
//! controller, not here.

use super::{ApiClient, ClientError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single user entity. The id is assigned by the server and absent on
/// records that have not been persisted yet; the client never invents one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    // A response without a `users` field decodes as an empty list.
    #[serde(default)]
    users: Vec<UserRecord>,
}

impl ApiClient {
    /// Fetch all users, preserving server order.
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        let value = self.get("/api/users").await?;
        let response: UsersResponse = serde_json::from_value(value)
            .map_err(|err| ClientError::Parse(format!("Failed to decode user list: {err}")))?;
        Ok(response.users)
    }

    /// Create a user from already-trimmed values.
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn create_user(&self, name: &str, email: &str) -> Result<Value, ClientError> {
        self.post("/api/users", &json!({ "name": name, "email": email }))
            .await
    }

    /// Update a user by id with already-trimmed values.
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update_user(
        &self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<Value, ClientError> {
        self.put(
            &format!("/api/users/{id}"),
            &json!({ "name": name, "email": email }),
        )
        .await
    }

    /// Delete a user by id.
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete_user(&self, id: &str) -> Result<Value, ClientError> {
        self.delete(&format!("/api/users/{id}")).await
    }
}
