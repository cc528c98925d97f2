//! Farmer and vet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{BookingPolicy, Farmer, Vet, WorkingHours};

const VET_COLUMNS: &str = r#"
    id, name, specialty, location, rating, reviews, bio, avatar,
    accepting_bookings, available_times
"#;

impl Database {
    /// Insert a new farmer.
    pub fn insert_farmer(&self, farmer: &Farmer) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO farmers (id, name, location, phone, avatar)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                farmer.id,
                farmer.name,
                farmer.location,
                farmer.phone,
                farmer.avatar,
            ],
        )?;
        Ok(())
    }

    /// Get a farmer by ID.
    pub fn get_farmer(&self, id: &str) -> DbResult<Option<Farmer>> {
        self.conn
            .query_row(
                "SELECT id, name, location, phone, avatar FROM farmers WHERE id = ?",
                [id],
                |row| {
                    Ok(Farmer {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        location: row.get(2)?,
                        phone: row.get(3)?,
                        avatar: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all farmers by name.
    pub fn list_farmers(&self) -> DbResult<Vec<Farmer>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, location, phone, avatar FROM farmers ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            Ok(Farmer {
                id: row.get(0)?,
                name: row.get(1)?,
                location: row.get(2)?,
                phone: row.get(3)?,
                avatar: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a new vet along with default working hours and booking policy.
    pub fn insert_vet(&self, vet: &Vet) -> DbResult<()> {
        let available_times_json = serde_json::to_string(&vet.available_times)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO vets (
                id, name, specialty, location, rating, reviews, bio, avatar,
                accepting_bookings, available_times
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                vet.id,
                vet.name,
                vet.specialty,
                vet.location,
                vet.rating,
                vet.reviews,
                vet.bio,
                vet.avatar,
                vet.accepting_bookings,
                available_times_json,
            ],
        )?;

        for hours in WorkingHours::default_week() {
            tx.execute(
                r#"
                INSERT INTO working_hours (vet_id, weekday, start_time, end_time, enabled)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    vet.id,
                    hours.weekday.num_days_from_monday(),
                    hours.start.format("%H:%M").to_string(),
                    hours.end.format("%H:%M").to_string(),
                    hours.enabled,
                ],
            )?;
        }

        let policy = BookingPolicy::default();
        tx.execute(
            r#"
            INSERT INTO booking_policies (vet_id, buffer_minutes, max_per_day, notice_hours)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                vet.id,
                policy.buffer_minutes,
                policy.max_per_day,
                policy.notice_hours,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Update a vet's profile fields.
    pub fn update_vet(&self, vet: &Vet) -> DbResult<bool> {
        let available_times_json = serde_json::to_string(&vet.available_times)?;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE vets SET
                name = ?2,
                specialty = ?3,
                location = ?4,
                rating = ?5,
                reviews = ?6,
                bio = ?7,
                avatar = ?8,
                accepting_bookings = ?9,
                available_times = ?10
            WHERE id = ?1
            "#,
            params![
                vet.id,
                vet.name,
                vet.specialty,
                vet.location,
                vet.rating,
                vet.reviews,
                vet.bio,
                vet.avatar,
                vet.accepting_bookings,
                available_times_json,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a vet by ID.
    pub fn get_vet(&self, id: &str) -> DbResult<Option<Vet>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM vets WHERE id = ?", VET_COLUMNS),
                [id],
                VetRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all vets by name.
    pub fn list_vets(&self) -> DbResult<Vec<Vet>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM vets ORDER BY name", VET_COLUMNS))?;

        let rows = stmt.query_map([], VetRow::from_row)?;

        let mut vets = Vec::new();
        for row in rows {
            vets.push(row?.try_into()?);
        }
        Ok(vets)
    }

    /// Switch whether farmers can book this vet.
    pub fn set_accepting_bookings(&self, vet_id: &str, accepting: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE vets SET accepting_bookings = ? WHERE id = ?",
            params![accepting, vet_id],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct VetRow {
    id: String,
    name: String,
    specialty: String,
    location: String,
    rating: f64,
    reviews: u32,
    bio: String,
    avatar: Option<String>,
    accepting_bookings: bool,
    available_times: String,
}

impl VetRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(VetRow {
            id: row.get(0)?,
            name: row.get(1)?,
            specialty: row.get(2)?,
            location: row.get(3)?,
            rating: row.get(4)?,
            reviews: row.get(5)?,
            bio: row.get(6)?,
            avatar: row.get(7)?,
            accepting_bookings: row.get(8)?,
            available_times: row.get(9)?,
        })
    }
}

impl TryFrom<VetRow> for Vet {
    type Error = DbError;

    fn try_from(row: VetRow) -> Result<Self, Self::Error> {
        let available_times: Vec<String> = serde_json::from_str(&row.available_times)?;

        Ok(Vet {
            id: row.id,
            name: row.name,
            specialty: row.specialty,
            location: row.location,
            rating: row.rating,
            reviews: row.reviews,
            bio: row.bio,
            avatar: row.avatar,
            accepting_bookings: row.accepting_bookings,
            available_times,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get_farmer() {
        let db = setup_db();

        let mut farmer = Farmer::new("John Doe".into(), "Kampala, Uganda".into(), "+256 700 123 456".into());
        farmer.avatar = Some("/placeholder.svg".into());
        db.insert_farmer(&farmer).unwrap();

        let retrieved = db.get_farmer(&farmer.id).unwrap().unwrap();
        assert_eq!(retrieved, farmer);
        assert!(db.get_farmer("nobody").unwrap().is_none());
    }

    #[test]
    fn test_insert_vet_creates_defaults() {
        let db = setup_db();

        let mut vet = Vet::new("Dr. Joseph Mukasa".into(), "Large Animal Specialist".into(), "Kampala".into());
        vet.available_times = vec!["9:00 AM".into(), "2:00 PM".into()];
        db.insert_vet(&vet).unwrap();

        let retrieved = db.get_vet(&vet.id).unwrap().unwrap();
        assert_eq!(retrieved.available_times, vec!["9:00 AM", "2:00 PM"]);
        assert!(retrieved.accepting_bookings);

        let hours: i64 = db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM working_hours WHERE vet_id = ?",
                [&vet.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hours, 7);
    }

    #[test]
    fn test_update_vet_and_toggle() {
        let db = setup_db();

        let mut vet = Vet::new("Dr. Okello".into(), "General".into(), "Jinja".into());
        db.insert_vet(&vet).unwrap();

        vet.rating = 4.7;
        vet.reviews = 156;
        assert!(db.update_vet(&vet).unwrap());

        assert!(db.set_accepting_bookings(&vet.id, false).unwrap());
        let retrieved = db.get_vet(&vet.id).unwrap().unwrap();
        assert_eq!(retrieved.reviews, 156);
        assert!(!retrieved.accepting_bookings);

        assert!(!db.set_accepting_bookings("missing", true).unwrap());
    }

    #[test]
    fn test_list_vets_sorted() {
        let db = setup_db();
        db.insert_vet(&Vet::new("Dr. Sarah".into(), "Poultry".into(), "Entebbe".into()))
            .unwrap();
        db.insert_vet(&Vet::new("Dr. David".into(), "General".into(), "Jinja".into()))
            .unwrap();

        let vets = db.list_vets().unwrap();
        assert_eq!(vets.len(), 2);
        assert_eq!(vets[0].name, "Dr. David");
    }
}
