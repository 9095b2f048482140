use crate::error::{BonusBallError, Result};
use crate::pool::PoolState;
use crate::storage::{PoolRepository, PoolSnapshot, Storage, POOL_DOCUMENT_ID};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

/// SQLite-backed pool document with optimistic versioning.
pub struct PoolStore {
    storage: Arc<Storage>,
}

impl PoolStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    fn current_version(conn: &Connection) -> Result<Option<u64>> {
        let version: Option<i64> = conn
            .query_row(
                "SELECT version FROM pool_documents WHERE id = ?1",
                params![POOL_DOCUMENT_ID],
                |row| row.get(0),
            )
            .optional()?;

        Ok(version.map(|v| v as u64))
    }
}

#[async_trait]
impl PoolRepository for PoolStore {
    async fn load(&self) -> Result<Option<PoolSnapshot>> {
        let conn = self.storage.connection().await;

        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT version, state FROM pool_documents WHERE id = ?1",
                params![POOL_DOCUMENT_ID],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((version, state_json)) => {
                let state: PoolState = serde_json::from_str(&state_json)?;
                state.check_invariants()?;
                Ok(Some(PoolSnapshot {
                    version: version as u64,
                    state,
                }))
            }
            None => Ok(None),
        }
    }

    async fn version(&self) -> Result<Option<u64>> {
        let conn = self.storage.connection().await;
        Self::current_version(&conn)
    }

    async fn save(&self, state: &PoolState, expected: Option<u64>) -> Result<u64> {
        let state_json = serde_json::to_string(state)?;
        let conn = self.storage.connection().await;
        let now = Utc::now().timestamp();

        let (changed, new_version) = match expected {
            None => {
                let changed = conn.execute(
                    "INSERT OR IGNORE INTO pool_documents (id, version, state, updated_at)
                     VALUES (?1, 1, ?2, ?3)",
                    params![POOL_DOCUMENT_ID, state_json, now],
                )?;
                (changed, 1)
            }
            Some(version) => {
                let changed = conn.execute(
                    "UPDATE pool_documents SET version = version + 1, state = ?1, updated_at = ?2
                     WHERE id = ?3 AND version = ?4",
                    params![state_json, now, POOL_DOCUMENT_ID, version as i64],
                )?;
                (changed, version + 1)
            }
        };

        if changed == 0 {
            let found = Self::current_version(&conn)?.unwrap_or(0);
            tracing::warn!(
                "Rejected pool write: expected version {:?}, store holds {}",
                expected,
                found
            );
            return Err(BonusBallError::StaleState {
                expected: expected.unwrap_or(0),
                found,
            });
        }

        tracing::debug!("Saved pool document version {}", new_version);
        Ok(new_version)
    }
}
