// src/store/mod.rs

pub mod repo;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::error::AppError;

/// Current on-disk schema version for store values.
pub const SCHEMA_VERSION: u32 = 1;

/// Versioned wrapper persisted around every value.
#[derive(serde::Serialize, serde::Deserialize)]
struct Envelope<T> {
    schema_version: u32,
    data: T,
}

/// Whole-value JSON store over a single SQLite table.
///
/// Each collection (users, listings, payments, ...) lives under one string
/// key and is read and written as a complete JSON blob. There are no partial
/// updates; `update` serializes all read-modify-write cycles through one
/// async mutex so mutations within a process are strictly ordered. Writers
/// in other processes remain last-writer-wins.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Reads and deserializes the value under `key`, if present.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match raw {
            None => Ok(None),
            Some(raw) => Ok(Some(Self::decode(key, &raw)?)),
        }
    }

    /// Serializes and upserts the value under `key`.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            data: value,
        };
        let raw = serde_json::to_string(&envelope)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        sqlx::query(
            "INSERT INTO store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(raw)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Read-modify-write under the store-wide lock.
    ///
    /// Loads the value under `key` (or `default()` when absent), applies `f`,
    /// persists the result, and returns whatever `f` returned. All collection
    /// mutations go through here so they are ordered within the process.
    pub async fn update<T, R>(
        &self,
        key: &str,
        default: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, AppError>
    where
        T: Serialize + DeserializeOwned,
    {
        let _guard = self.write_lock.lock().await;

        let mut value = self.get::<T>(key).await?.unwrap_or_else(default);
        let result = f(&mut value);
        self.put(key, &value).await?;

        Ok(result)
    }

    /// Decodes a raw blob, validating the schema version.
    ///
    /// Older versions get migrated here as they appear; a version newer than
    /// this binary understands is refused rather than misread.
    fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, AppError> {
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| AppError::InternalServerError(format!("corrupt store value '{key}': {e}")))?;

        match envelope.schema_version {
            SCHEMA_VERSION => serde_json::from_value(envelope.data).map_err(|e| {
                AppError::InternalServerError(format!("corrupt store value '{key}': {e}"))
            }),
            other => Err(AppError::InternalServerError(format!(
                "store value '{key}' has schema version {other}, this build understands {SCHEMA_VERSION}"
            ))),
        }
    }
}
