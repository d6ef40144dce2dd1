//! SQLite-based session storage.
//!
//! Persists the completed-interval log between runs. A running session
//! appends each completion as it happens; nothing here rewrites rows that
//! another handle wrote or cleared.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::session::{SessionRecord, SessionStore};
use crate::timer::TimerMode;

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pomowatch/pomowatch.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("pomowatch.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                mode             TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                occurred_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_occurred_at ON sessions(occurred_at);",
        )?;
        Ok(())
    }

    /// Append a single record.
    pub fn append_session(&self, record: &SessionRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (mode, duration_minutes, occurred_at) VALUES (?1, ?2, ?3)",
            params![
                record.mode.as_str(),
                record.duration_minutes,
                record.occurred_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn clear_sessions(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM sessions", [])?)
    }

    /// All records in insertion order.
    pub fn sessions(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mode, duration_minutes, occurred_at FROM sessions ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, mode, duration_minutes, occurred_at) = row?;
            let mode = TimerMode::parse(&mode).ok_or_else(|| DatabaseError::CorruptRow {
                row: id,
                message: format!("unknown mode '{mode}'"),
            })?;
            let occurred_at = DateTime::parse_from_rfc3339(&occurred_at)
                .map_err(|e| DatabaseError::CorruptRow {
                    row: id,
                    message: e.to_string(),
                })?
                .with_timezone(&Utc);
            out.push(SessionRecord {
                occurred_at,
                mode,
                duration_minutes,
            });
        }
        Ok(out)
    }
}

impl SessionStore for Database {
    fn save(&mut self, sessions: &[SessionRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sessions (mode, duration_minutes, occurred_at) VALUES (?1, ?2, ?3)",
            )?;
            for record in sessions {
                stmt.execute(params![
                    record.mode.as_str(),
                    record.duration_minutes,
                    record.occurred_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<SessionRecord>> {
        self.sessions()
    }
}
