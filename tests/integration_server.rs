//! End-to-end tests: the users API served on an ephemeral port, exercised
//! with raw HTTP calls and through the typed client plus the directory
//! controller.

use anyhow::{anyhow, Result};
use gridfolio::client::ApiClient;
use gridfolio::dashboard::{Confirm, UserDirectory};
use gridfolio::gridfolio::{router, store::MemoryUserStore};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

struct Decision(bool);

impl Confirm for Decision {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

async fn serve() -> Result<String> {
    let store = Arc::new(MemoryUserStore::default());
    let app = router(store);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn create_then_list_roundtrip() -> Result<()> {
    let base = serve().await?;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{base}/api/users"))
        .json(&json!({ "name": "Ann", "email": "a@x.com" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await?;
    assert_eq!(body["message"], "User created");
    let id = body["id"]
        .as_str()
        .ok_or_else(|| anyhow!("expected id in response"))?
        .to_string();

    let response = http.get(format!("{base}/api/users")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    let users = body["users"]
        .as_array()
        .ok_or_else(|| anyhow!("expected users array"))?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], Value::String(id));
    assert_eq!(users[0]["name"], "Ann");
    assert_eq!(users[0]["email"], "a@x.com");
    Ok(())
}

#[tokio::test]
async fn create_rejects_blank_fields() -> Result<()> {
    let base = serve().await?;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{base}/api/users"))
        .json(&json!({ "name": "   ", "email": "a@x.com" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Name and email are required");
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_body() -> Result<()> {
    let base = serve().await?;
    let http = reqwest::Client::new();

    let response = http.post(format!("{base}/api/users")).send().await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await?;
    assert_eq!(body["error"], "No JSON body provided");
    Ok(())
}

#[tokio::test]
async fn update_validates_id_and_existence() -> Result<()> {
    let base = serve().await?;
    let http = reqwest::Client::new();

    let response = http
        .put(format!("{base}/api/users/not-a-uuid"))
        .json(&json!({ "name": "Ann", "email": "a@x.com" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Invalid user ID format");

    let response = http
        .put(format!(
            "{base}/api/users/00000000-0000-4000-8000-000000000000"
        ))
        .json(&json!({ "name": "Ann", "email": "a@x.com" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "User not found");
    Ok(())
}

#[tokio::test]
async fn delete_validates_id_and_existence() -> Result<()> {
    let base = serve().await?;
    let http = reqwest::Client::new();

    let response = http
        .delete(format!("{base}/api/users/not-a-uuid"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = http
        .delete(format!(
            "{base}/api/users/00000000-0000-4000-8000-000000000000"
        ))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "User not found");
    Ok(())
}

#[tokio::test]
async fn hello_and_health_respond() -> Result<()> {
    let base = serve().await?;
    let http = reqwest::Client::new();

    let response = http.get(format!("{base}/api/hello")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Hello from gridfolio!");

    let response = http.get(format!("{base}/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));
    let body: Value = response.json().await?;
    assert_eq!(body["name"], "gridfolio");
    assert_eq!(body["store"], "ok");
    Ok(())
}

#[tokio::test]
async fn requests_carry_a_request_id() -> Result<()> {
    let base = serve().await?;
    let http = reqwest::Client::new();

    let response = http.get(format!("{base}/api/hello")).send().await?;
    assert!(response.headers().contains_key("x-request-id"));
    Ok(())
}

#[tokio::test]
async fn dashboard_scenario_add_update_delete() -> Result<()> {
    let base = serve().await?;

    // Seed the server with one user, as if another client created it.
    let seed = ApiClient::new(&base)?;
    seed.create_user("Ann", "a@x.com").await?;

    let client = ApiClient::new(&base)?;
    let mut directory = UserDirectory::with_confirm(client, Box::new(Decision(true)));

    // Initial mount: one entry.
    directory.refresh().await;
    assert_eq!(directory.error(), None);
    assert_eq!(directory.users().len(), 1);
    assert_eq!(directory.users()[0].name, "Ann");
    assert_eq!(directory.users()[0].email, "a@x.com");

    // Add with untrimmed input: the trimmed payload goes over the wire and
    // the refetch shows two entries.
    directory.add_user(" Bo ", " b@x.com ").await;
    assert_eq!(directory.error(), None);
    assert_eq!(directory.users().len(), 2);
    assert_eq!(directory.users()[1].name, "Bo");
    assert_eq!(directory.users()[1].email, "b@x.com");

    // Edit the first entry.
    let ann = directory.users()[0].clone();
    directory.start_edit(&ann);
    directory.update_user("Anna", "anna@x.com").await;
    assert_eq!(directory.error(), None);
    assert!(!directory.is_editing());
    assert_eq!(directory.users()[0].name, "Anna");

    // Delete the second entry after confirmation.
    let bo = directory.users()[1].clone();
    directory.delete_user(&bo).await;
    assert_eq!(directory.error(), None);
    assert_eq!(directory.users().len(), 1);
    assert_eq!(directory.users()[0].name, "Anna");
    Ok(())
}

#[tokio::test]
async fn dashboard_declined_delete_leaves_server_state() -> Result<()> {
    let base = serve().await?;

    let seed = ApiClient::new(&base)?;
    seed.create_user("Ann", "a@x.com").await?;

    let client = ApiClient::new(&base)?;
    let mut directory = UserDirectory::with_confirm(client, Box::new(Decision(false)));

    directory.refresh().await;
    let ann = directory.users()[0].clone();

    directory.delete_user(&ann).await;
    assert_eq!(directory.error(), None);

    directory.refresh().await;
    assert_eq!(directory.users().len(), 1);
    Ok(())
}
