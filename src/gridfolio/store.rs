//! Storage behind the users API. The trait keeps handlers independent of the
//! backend: Postgres in deployments, an in-memory store for development and
//! tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, Connection, PgPool, Row};
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A persisted user, id always known.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Backend(anyhow::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(formatter, "User not found"),
            Self::Backend(err) => write!(formatter, "{err}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in creation order.
    async fn list(&self) -> Result<Vec<StoredUser>, StoreError>;

    /// Insert a user and return it with its server-assigned id.
    async fn create(&self, name: &str, email: &str) -> Result<StoredUser, StoreError>;

    /// Update a user by id; `NotFound` when the id does not exist.
    async fn update(&self, id: Uuid, name: &str, email: &str) -> Result<(), StoreError>;

    /// Delete a user by id; `NotFound` when the id does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Liveness check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

/// Postgres-backed store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Connect to the database and build a store.
    /// # Errors
    /// Returns an error if the connection pool cannot be established.
    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .map_err(backend)?;

        Ok(Self { pool })
    }

    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<StoredUser>, StoreError> {
        let query = r"
            SELECT id::text AS id, name, email
            FROM users
            ORDER BY created_at
        ";
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|row| StoredUser {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
            })
            .collect())
    }

    async fn create(&self, name: &str, email: &str) -> Result<StoredUser, StoreError> {
        let query = r"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id::text AS id
        ";
        let row = sqlx::query(query)
            .bind(name)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        Ok(StoredUser {
            id: row.get("id"),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    async fn update(&self, id: Uuid, name: &str, email: &str) -> Result<(), StoreError> {
        let query = "UPDATE users SET name = $1, email = $2 WHERE id = $3";
        let result = sqlx::query(query)
            .bind(name)
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let query = "DELETE FROM users WHERE id = $1";
        let result = sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await.map_err(backend)?;
        conn.ping().await.map_err(backend)
    }
}

/// In-memory store, insertion order preserved. Suitable for development and
/// tests only; contents are lost on shutdown.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<StoredUser>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<StoredUser>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn create(&self, name: &str, email: &str) -> Result<StoredUser, StoreError> {
        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };

        self.users.write().await.push(user.clone());

        Ok(user)
    }

    async fn update(&self, id: Uuid, name: &str, email: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        let mut users = self.users.write().await;

        let Some(user) = users.iter_mut().find(|user| user.id == id) else {
            return Err(StoreError::NotFound);
        };

        user.name = name.to_string();
        user.email = email.to_string();

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let id = id.to_string();
        let mut users = self.users.write().await;

        let before = users.len();
        users.retain(|user| user.id != id);

        if users.len() == before {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
