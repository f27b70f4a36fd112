use async_trait::async_trait;
use sqlx::PgPool;

use camgate_application::StorageBackend;
use camgate_core::{AppError, AppResult};


/// PostgreSQL-backed key-value storage.
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates storage with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageBackend for PostgresStorage {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        sqlx::query_scalar::<_, Vec<u8>>(
            r#"
            SELECT value
            FROM storage_entries
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read storage entry '{key}': {error}")))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO storage_entries (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to write storage entry '{key}': {error}")))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM storage_entries
            WHERE key = $1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete storage entry '{key}': {error}"))
        })?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>(
            r#"
            SELECT key
            FROM storage_entries
            WHERE starts_with(key, $1)
            ORDER BY key
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list storage entries under '{prefix}': {error}"))
        })?;

        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(prefix).map(str::to_owned))
            .collect())
    }
}
