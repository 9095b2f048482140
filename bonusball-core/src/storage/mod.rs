pub mod pool_store;

pub use pool_store::PoolStore;

use crate::error::{BonusBallError, Result};
use crate::pool::PoolState;
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

/// Singleton id of the pool document.
pub const POOL_DOCUMENT_ID: i64 = 1;

/// A stored pool together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub version: u64,
    pub state: PoolState,
}

/// Durable home of the pool document.
#[async_trait]
pub trait PoolRepository: Send + Sync {
    async fn load(&self) -> Result<Option<PoolSnapshot>>;

    /// Current stored version, without decoding the document.
    async fn version(&self) -> Result<Option<u64>>;

    /// Writes `state` if the stored version still equals `expected`
    /// (`None` meaning no document yet) and returns the new version.
    async fn save(&self, state: &PoolState, expected: Option<u64>) -> Result<u64>;
}

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                BonusBallError::internal(format!("Failed to create directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS pool_documents (
                id INTEGER PRIMARY KEY,
                version INTEGER NOT NULL,
                state TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub(crate) async fn connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
