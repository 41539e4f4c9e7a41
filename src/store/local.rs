//! SQLite-backed key-value storage.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use super::StorageBackend;
use crate::errors::AppError;

/// Keeps each collection as a JSON document in the `local_storage` table.
#[derive(Clone)]
pub struct LocalStorage {
    pool: SqlitePool,
}

impl LocalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        let row = sqlx::query("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let text: String = row.get("value");
        serde_json::from_str(&text).map(Some).map_err(|e| {
            tracing::error!("Stored value under {} is not JSON: {}", key, e);
            AppError::Storage(format!("Stored value under {} is not JSON: {}", key, e))
        })
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO local_storage (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value.to_string())
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
