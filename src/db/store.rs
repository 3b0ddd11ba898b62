//! Persistent key/value context store.
//!
//! The UI collaborator writes the active tournament and its roster here; the
//! pipeline only reads them.

use crate::domain::TournamentContext;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tokio::sync::RwLock;

pub const ACTIVE_TOURNAMENT_ID_KEY: &str = "activeTournamentId";
pub const ACTIVE_TOURNAMENT_KEY: &str = "activeTournament";
pub const TOURNAMENT_PLAYERS_KEY: &str = "tournamentPlayers";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("invalid stored value: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One change in a batch: `Some` sets the key, `None` removes it.
pub type ContextWrite<'a> = (&'a str, Option<Value>);

/// Small async get/set/remove map of JSON values.
///
/// Batches are all-or-nothing and readers never observe half of one.
#[async_trait]
pub trait ContextStore: Send + Sync + fmt::Debug {
    /// Read several keys from one consistent snapshot, in the order given.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Value>>, StoreError>;

    /// Apply every write or none of them.
    async fn write_many(&self, writes: &[ContextWrite<'_>]) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.get_many(&[key]).await?.pop().flatten())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.write_many(&[(key, Some(value.clone()))]).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.write_many(&[(key, None)]).await
    }
}

/// Read the active tournament id and roster snapshot.
///
/// Missing keys read as "no active tournament" and an empty roster.
pub async fn load_tournament_context(
    store: &dyn ContextStore,
) -> Result<TournamentContext, StoreError> {
    let mut values = store
        .get_many(&[ACTIVE_TOURNAMENT_ID_KEY, TOURNAMENT_PLAYERS_KEY])
        .await?
        .into_iter();
    let active_tournament_id = values.next().flatten().filter(|v| !v.is_null());
    let players = match values.next().flatten() {
        Some(Value::Null) | None => Vec::new(),
        Some(v) => serde_json::from_value(v)?,
    };
    Ok(TournamentContext {
        active_tournament_id,
        players,
    })
}

/// Replace the active tournament id and roster snapshot in one batch.
pub async fn save_tournament_context(
    store: &dyn ContextStore,
    context: &TournamentContext,
) -> Result<(), StoreError> {
    let active_id = context
        .active_tournament_id
        .clone()
        .filter(|id| !id.is_null());
    let players = serde_json::to_value(&context.players)?;
    store
        .write_many(&[
            (ACTIVE_TOURNAMENT_ID_KEY, active_id),
            (TOURNAMENT_PLAYERS_KEY, Some(players)),
        ])
        .await
}

/// Forget the active tournament (e.g. after it was deleted).
pub async fn clear_tournament_context(store: &dyn ContextStore) -> Result<(), StoreError> {
    store
        .write_many(&[
            (ACTIVE_TOURNAMENT_ID_KEY, None),
            (ACTIVE_TOURNAMENT_KEY, None),
            (TOURNAMENT_PLAYERS_KEY, None),
        ])
        .await
}

/// SQLite-backed store; values are kept as JSON text.
#[derive(Debug, Clone)]
pub struct SqliteContextStore {
    pool: SqlitePool,
}

impl SqliteContextStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO context_store (key, value, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
"#;

#[async_trait]
impl ContextStore for SqliteContextStore {
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Value>>, StoreError> {
        // A read transaction pins one WAL snapshot for every key.
        let mut tx = self.pool.begin().await?;
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let row = sqlx::query("SELECT value FROM context_store WHERE key = ?")
                .bind(*key)
                .fetch_optional(&mut *tx)
                .await?;
            let value = match row {
                Some(row) => {
                    let raw: String = row.try_get("value")?;
                    Some(serde_json::from_str(&raw)?)
                }
                None => None,
            };
            values.push(value);
        }
        tx.commit().await?;
        Ok(values)
    }

    async fn write_many(&self, writes: &[ContextWrite<'_>]) -> Result<(), StoreError> {
        if writes.is_empty() {
            return Ok(());
        }

        let updated_at = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in writes {
            match value {
                Some(value) => {
                    sqlx::query(UPSERT_SQL)
                        .bind(*key)
                        .bind(serde_json::to_string(value)?)
                        .bind(&updated_at)
                        .execute(&mut *tx)
                        .await?;
                }
                None => {
                    sqlx::query("DELETE FROM context_store WHERE key = ?")
                        .bind(*key)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryContextStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for MemoryContextStore {
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Value>>, StoreError> {
        let values = self.values.read().await;
        Ok(keys.iter().map(|key| values.get(*key).cloned()).collect())
    }

    async fn write_many(&self, writes: &[ContextWrite<'_>]) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        for (key, value) in writes {
            match value {
                Some(value) => {
                    values.insert(key.to_string(), value.clone());
                }
                None => {
                    values.remove(*key);
                }
            }
        }
        Ok(())
    }
}
