use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::error::{CoreError, Result};

pub const IN_MEMORY: &str = ":memory:";

/// A single SQLite connection guarded by a mutex.
///
/// Services share it behind an `Arc`; each storage call holds the lock only
/// for the statements it runs.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let conn = Connection::open(path)?;
            // journal_mode returns a row, so it cannot go through execute_batch
            conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
            conn
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        info!("Opened database {}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(IN_MEMORY)
    }

    /// Runs an idempotent schema batch (`CREATE TABLE IF NOT EXISTS ...`).
    pub fn migrate(&self, schema: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(schema)?;
            Ok(())
        })
    }

    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| CoreError::Poisoned)?;
        f(&mut conn)
    }
}

/// Case-insensitive substring match using Unicode case folding on both sides.
///
/// SQLite's `lower()` and `LIKE` only fold ASCII, so searches filter in Rust.
/// An empty or blank term matches everything.
pub fn matches_term(text: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || text.to_lowercase().contains(&term.to_lowercase())
}
