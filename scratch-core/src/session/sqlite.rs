use super::{Portal, SessionStore, StoredSession};
use crate::error::{Result, ScratchError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tokio::sync::Mutex;

/// Sessions persisted in a small SQLite database under the data directory.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ScratchError::internal(format!("Failed to create directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };

        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                portal TEXT PRIMARY KEY,
                token TEXT NOT NULL,
                account TEXT,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self, portal: Portal) -> Result<Option<StoredSession>> {
        let conn = self.conn.lock().await;

        let row = conn
            .query_row(
                "SELECT token, account, created_at FROM sessions WHERE portal = ?1",
                params![portal.storage_key()],
                |row| {
                    let token: String = row.get(0)?;
                    let account: Option<String> = row.get(1)?;
                    let created_at: i64 = row.get(2)?;
                    Ok((token, account, created_at))
                },
            )
            .optional()?;

        let Some((token, account, created_at)) = row else {
            return Ok(None);
        };

        // A corrupt cached account is not worth failing the session over.
        let account = account.and_then(|json| serde_json::from_str(&json).ok());

        Ok(Some(StoredSession {
            token,
            account,
            created_at: chrono::DateTime::from_timestamp(created_at, 0)
                .unwrap_or_else(Utc::now),
        }))
    }

    async fn save(&self, portal: Portal, session: &StoredSession) -> Result<()> {
        let account = session
            .account
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO sessions (portal, token, account, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                portal.storage_key(),
                session.token,
                account,
                session.created_at.timestamp(),
            ],
        )?;

        Ok(())
    }

    async fn clear(&self, portal: Portal) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "DELETE FROM sessions WHERE portal = ?1",
            params![portal.storage_key()],
        )?;
        Ok(())
    }
}
