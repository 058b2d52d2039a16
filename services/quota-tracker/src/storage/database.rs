use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task::spawn_blocking;
use tracing::debug;

use super::error::StorageError;
use super::schema::init_database;
use super::{KeyValueStore, USAGE_DB_FILENAME};

/// SQLite-backed key-value store living in `<data_dir>/usage.db`.
pub struct SqliteKeyValueStore {
    db_path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStore {
    pub fn new(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(USAGE_DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        init_database(&conn)?;

        debug!(path = %db_path.display(), "opened usage database");

        Ok(Self {
            db_path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StorageError::ConnectionPoisoned)?;
            op(&*conn)
        })
        .await?
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_connection(move |conn| {
            let now = Utc::now().to_rfc3339();
            conn.execute(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )?;
            Ok(())
        })
        .await
    }
}
