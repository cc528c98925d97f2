//! SQLite schema definition.

/// Complete database schema for Vetco.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Parties
-- ============================================================================

CREATE TABLE IF NOT EXISTS farmers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    location TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    avatar TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS vets (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    specialty TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '',
    rating REAL NOT NULL DEFAULT 0,
    reviews INTEGER NOT NULL DEFAULT 0,
    bio TEXT NOT NULL DEFAULT '',
    avatar TEXT,
    accepting_bookings INTEGER NOT NULL DEFAULT 1,
    available_times TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_vets_name ON vets(name);

-- ============================================================================
-- Appointments
-- ============================================================================

-- One row per appointment: the status column is the bucket, so an id can
-- never sit in two buckets. bucket_seq is restamped on every bucket move and
-- gives append-on-move ordering within a bucket.
CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    farmer_id TEXT NOT NULL REFERENCES farmers(id),
    vet_id TEXT NOT NULL REFERENCES vets(id),
    date TEXT NOT NULL,                           -- YYYY-MM-DD
    time TEXT NOT NULL,                           -- HH:MM (24h)
    location TEXT NOT NULL DEFAULT '',
    animal_type TEXT NOT NULL DEFAULT '',
    animal_id TEXT,
    issue TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'confirmed', 'completed', 'cancelled')),
    diagnosis TEXT,
    treatment TEXT,
    cancellation_reason TEXT,
    bucket_seq INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK (status != 'completed' OR (diagnosis IS NOT NULL AND treatment IS NOT NULL)),
    CHECK (status != 'cancelled' OR cancellation_reason IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS idx_appointments_vet ON appointments(vet_id, status, bucket_seq);
CREATE INDEX IF NOT EXISTS idx_appointments_farmer ON appointments(farmer_id, status, bucket_seq);

-- Monotonic counter backing bucket_seq (single row)
CREATE TABLE IF NOT EXISTS bucket_sequence (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    value INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO bucket_sequence (id, value) VALUES (1, 0);

-- ============================================================================
-- Animal Registry & Health Records
-- ============================================================================

CREATE TABLE IF NOT EXISTS animals (
    id TEXT PRIMARY KEY,
    farmer_id TEXT NOT NULL REFERENCES farmers(id),
    name TEXT NOT NULL,
    animal_type TEXT NOT NULL,
    breed TEXT,
    birth_date TEXT,
    gender TEXT CHECK (gender IS NULL OR gender IN ('Male', 'Female')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_animals_farmer ON animals(farmer_id);

CREATE TABLE IF NOT EXISTS health_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id TEXT NOT NULL REFERENCES animals(id),
    animal_name TEXT NOT NULL,                    -- denormalized from animals
    animal_type TEXT NOT NULL,                    -- denormalized from animals
    record_type TEXT NOT NULL,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    vet TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_health_records_animal ON health_records(animal_id);

-- ============================================================================
-- Messaging
-- ============================================================================

CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    farmer_id TEXT NOT NULL REFERENCES farmers(id),
    vet_id TEXT NOT NULL REFERENCES vets(id),
    last_message TEXT NOT NULL DEFAULT '',
    last_message_at TEXT,
    unread_by_farmer INTEGER NOT NULL DEFAULT 0,
    unread_by_vet INTEGER NOT NULL DEFAULT 0,
    UNIQUE (farmer_id, vet_id)
);

CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES conversations(id),
    sender TEXT NOT NULL CHECK (sender IN ('farmer', 'vet')),
    text TEXT NOT NULL,
    sent_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id, id);

CREATE TABLE IF NOT EXISTS scheduled_replies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES conversations(id),
    sender TEXT NOT NULL CHECK (sender IN ('farmer', 'vet')),
    text TEXT NOT NULL,
    due_at_ms INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scheduled_replies_due ON scheduled_replies(due_at_ms);

-- ============================================================================
-- Availability
-- ============================================================================

CREATE TABLE IF NOT EXISTS working_hours (
    vet_id TEXT NOT NULL REFERENCES vets(id),
    weekday INTEGER NOT NULL CHECK (weekday BETWEEN 0 AND 6),  -- 0 = Monday
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    enabled INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (vet_id, weekday)
);

CREATE TABLE IF NOT EXISTS service_locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vet_id TEXT NOT NULL REFERENCES vets(id),
    name TEXT NOT NULL,
    radius_km INTEGER NOT NULL DEFAULT 15,
    is_default INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_service_locations_vet ON service_locations(vet_id);

CREATE TABLE IF NOT EXISTS service_offerings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vet_id TEXT NOT NULL REFERENCES vets(id),
    name TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
    price_ugx INTEGER NOT NULL CHECK (price_ugx > 0)
);

CREATE INDEX IF NOT EXISTS idx_service_offerings_vet ON service_offerings(vet_id);

CREATE TABLE IF NOT EXISTS special_dates (
    vet_id TEXT NOT NULL REFERENCES vets(id),
    date TEXT NOT NULL,
    available INTEGER NOT NULL DEFAULT 0,
    reason TEXT NOT NULL,
    PRIMARY KEY (vet_id, date)
);

CREATE TABLE IF NOT EXISTS booking_policies (
    vet_id TEXT PRIMARY KEY REFERENCES vets(id),
    buffer_minutes INTEGER NOT NULL DEFAULT 30,
    max_per_day INTEGER NOT NULL DEFAULT 8 CHECK (max_per_day >= 1),
    notice_hours INTEGER NOT NULL DEFAULT 2
);

-- ============================================================================
-- Directory Preferences
-- ============================================================================

CREATE TABLE IF NOT EXISTS vet_preferences (
    farmer_id TEXT NOT NULL REFERENCES farmers(id),
    vet_id TEXT NOT NULL REFERENCES vets(id),
    favorite INTEGER NOT NULL DEFAULT 0,
    saved INTEGER NOT NULL DEFAULT 0,
    note TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (farmer_id, vet_id)
);

-- ============================================================================
-- Knowledge Hub
-- ============================================================================

CREATE TABLE IF NOT EXISTS diseases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    symptoms TEXT NOT NULL DEFAULT '',
    treatment TEXT NOT NULL DEFAULT '',
    prevention TEXT NOT NULL DEFAULT ''
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO farmers (id, name) VALUES ('farmer-001', 'John Doe')",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO vets (id, name) VALUES ('vet-001', 'Dr. Mukasa')", [])
            .unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_completed_requires_diagnosis_and_treatment() {
        let conn = setup();

        let result = conn.execute(
            r#"INSERT INTO appointments (farmer_id, vet_id, date, time, status, diagnosis,
                   bucket_seq, created_at, updated_at)
               VALUES ('farmer-001', 'vet-001', '2023-12-10', '09:00', 'completed', 'Mastitis',
                   1, 'now', 'now')"#,
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            r#"INSERT INTO appointments (farmer_id, vet_id, date, time, status, diagnosis, treatment,
                   bucket_seq, created_at, updated_at)
               VALUES ('farmer-001', 'vet-001', '2023-12-10', '09:00', 'completed', 'Mastitis',
                   'Antibiotics', 1, 'now', 'now')"#,
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_cancelled_requires_reason() {
        let conn = setup();

        let result = conn.execute(
            r#"INSERT INTO appointments (farmer_id, vet_id, date, time, status,
                   bucket_seq, created_at, updated_at)
               VALUES ('farmer-001', 'vet-001', '2023-12-08', '14:00', 'cancelled', 1, 'now', 'now')"#,
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_requires_existing_animal() {
        let conn = setup();

        let result = conn.execute(
            r#"INSERT INTO health_records (animal_id, animal_name, animal_type, record_type, date, description)
               VALUES ('COW-404', 'Ghost', 'Dairy Cow', 'Vaccination', '2023-12-15', 'ECF')"#,
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_one_conversation_per_pair() {
        let conn = setup();

        conn.execute(
            "INSERT INTO conversations (farmer_id, vet_id) VALUES ('farmer-001', 'vet-001')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO conversations (farmer_id, vet_id) VALUES ('farmer-001', 'vet-001')",
            [],
        );
        assert!(result.is_err());
    }
}
