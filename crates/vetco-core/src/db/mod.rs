//! Database layer for Vetco.
//!
//! A single SQLite connection holds every entity collection so the farmer
//! and vet views read and write the same records. In-memory by default.

mod schema;
mod parties;
mod appointments;
mod animals;
mod messages;
mod availability;
mod directory;
mod knowledge;

pub use schema::SCHEMA;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        log::debug!("Database schema initialized");
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

/// Parse a stored `YYYY-MM-DD` column.
pub(crate) fn parse_date_column(value: &str) -> DbResult<chrono::NaiveDate> {
    crate::models::calendar::parse_date(value)
        .ok_or_else(|| DbError::Constraint(format!("Invalid stored date: {}", value)))
}

/// Parse a stored `HH:MM` column.
pub(crate) fn parse_time_column(value: &str) -> DbResult<chrono::NaiveTime> {
    crate::models::calendar::parse_time(value)
        .ok_or_else(|| DbError::Constraint(format!("Invalid stored time: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_open_file_reopens_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vetco.db");

        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .execute("INSERT INTO farmers (id, name) VALUES ('farmer-001', 'John')", [])
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM farmers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in [
            "farmers",
            "vets",
            "appointments",
            "animals",
            "health_records",
            "conversations",
            "messages",
            "scheduled_replies",
            "working_hours",
            "service_locations",
            "service_offerings",
            "special_dates",
            "booking_policies",
            "vet_preferences",
            "diseases",
        ] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
    }
}
