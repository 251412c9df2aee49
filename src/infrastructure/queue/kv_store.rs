use crate::application::ports::token_store::TokenStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};

pub const TOKEN_KEY: &str = "story_app_token";
pub const QUEUE_KEY: &str = "offline_request_queue";

/// A localStorage-style string store: one value per fixed key.
#[derive(Clone)]
pub struct KvStore {
    pool: Pool<Sqlite>,
}

impl KvStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Token storage on top of the key-value table, under the same fixed key
/// the web client used.
pub struct KvTokenStore {
    kv: KvStore,
}

impl KvTokenStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl TokenStore for KvTokenStore {
    async fn get_token(&self) -> Result<Option<String>, AppError> {
        self.kv.get(TOKEN_KEY).await
    }

    async fn set_token(&self, token: &str) -> Result<(), AppError> {
        self.kv.set(TOKEN_KEY, token).await
    }

    async fn clear_token(&self) -> Result<(), AppError> {
        self.kv.remove(TOKEN_KEY).await
    }
}
