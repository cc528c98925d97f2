//! Appointment database operations.
//!
//! The store enforces shape, not policy: transition legality and input
//! validation live in [`crate::scheduling`].

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension, Row, ToSql};

use super::{parse_date_column, parse_time_column, Database, DbError, DbResult};
use crate::models::{
    calendar, Appointment, AppointmentStatus, FarmerSummary, StatusBucket, StatusCounts,
    VetSummary,
};

const APPOINTMENT_SELECT: &str = r#"
    SELECT a.id, a.date, a.time, a.location, a.animal_type, a.animal_id, a.issue, a.notes,
           a.status, a.diagnosis, a.treatment, a.cancellation_reason,
           a.created_at, a.updated_at,
           f.id, f.name, f.location, f.phone, f.avatar,
           v.id, v.name, v.specialty, v.avatar
    FROM appointments a
    JOIN farmers f ON f.id = a.farmer_id
    JOIN vets v ON v.id = a.vet_id
"#;

impl Database {
    /// Insert a new appointment, returning its assigned ID.
    ///
    /// `appointment.id` is ignored; ids come from the table's rowid sequence.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<i64> {
        let (status, diagnosis, treatment, reason) = status_columns(&appointment.status);
        let seq = self.next_bucket_seq()?;

        self.conn.execute(
            r#"
            INSERT INTO appointments (
                farmer_id, vet_id, date, time, location, animal_type, animal_id,
                issue, notes, status, diagnosis, treatment, cancellation_reason,
                bucket_seq, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                appointment.farmer.id,
                appointment.vet.id,
                calendar::format_date(appointment.date),
                calendar::format_time_24h(appointment.time),
                appointment.location,
                appointment.animal_type,
                appointment.animal_id,
                appointment.issue,
                appointment.notes,
                status,
                diagnosis,
                treatment,
                reason,
                seq,
                appointment.created_at,
                appointment.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: i64) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("{} WHERE a.id = ?", APPOINTMENT_SELECT),
                [id],
                AppointmentRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List one bucket for a vet, in bucket order.
    pub fn list_vet_bucket(&self, vet_id: &str, bucket: StatusBucket) -> DbResult<Vec<Appointment>> {
        self.query_appointments(
            "WHERE a.vet_id = ?1 AND a.status = ?2 ORDER BY a.bucket_seq",
            &[&vet_id, &bucket.as_str()],
        )
    }

    /// List a farmer's appointments in any of `buckets`, in bucket order.
    pub fn list_farmer_appointments(
        &self,
        farmer_id: &str,
        buckets: &[StatusBucket],
    ) -> DbResult<Vec<Appointment>> {
        let mut appointments = self.query_appointments(
            "WHERE a.farmer_id = ?1 ORDER BY a.bucket_seq",
            &[&farmer_id],
        )?;
        appointments.retain(|a| buckets.contains(&a.bucket()));
        Ok(appointments)
    }

    /// Open (pending or confirmed) appointments for a vet on a date, by time.
    pub fn list_open_appointments_on(
        &self,
        vet_id: &str,
        date: NaiveDate,
    ) -> DbResult<Vec<Appointment>> {
        self.query_appointments(
            r#"WHERE a.vet_id = ?1 AND a.date = ?2 AND a.status IN ('pending', 'confirmed')
               ORDER BY a.time"#,
            &[&vet_id, &calendar::format_date(date)],
        )
    }

    /// Overwrite the status (and its data), moving the appointment to the
    /// end of its new bucket.
    pub fn update_appointment_status(&self, id: i64, status: &AppointmentStatus) -> DbResult<bool> {
        let (status_str, diagnosis, treatment, reason) = status_columns(status);
        let seq = self.next_bucket_seq()?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments SET
                status = ?2,
                diagnosis = ?3,
                treatment = ?4,
                cancellation_reason = ?5,
                bucket_seq = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                status_str,
                diagnosis,
                treatment,
                reason,
                seq,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Change date and time in place. Bucket and bucket order are kept.
    pub fn update_appointment_schedule(
        &self,
        id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET date = ?2, time = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                id,
                calendar::format_date(date),
                calendar::format_time_24h(time),
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Overwrite the free-text notes.
    pub fn update_appointment_notes(&self, id: i64, notes: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET notes = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, notes, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Per-bucket totals for one vet.
    pub fn appointment_status_counts(&self, vet_id: &str) -> DbResult<StatusCounts> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM appointments WHERE vet_id = ? GROUP BY status",
        )?;
        let rows = stmt.query_map([vet_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;

        let mut counts = StatusCounts::default();
        for row in rows {
            let (status, count) = row?;
            match string_to_bucket(&status)? {
                StatusBucket::Pending => counts.pending = count,
                StatusBucket::Confirmed => counts.confirmed = count,
                StatusBucket::Completed => counts.completed = count,
                StatusBucket::Cancelled => counts.cancelled = count,
            }
        }
        Ok(counts)
    }

    fn query_appointments(
        &self,
        clause: &str,
        params: &[&dyn ToSql],
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} {}", APPOINTMENT_SELECT, clause))?;

        let rows = stmt.query_map(params, AppointmentRow::from_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    fn next_bucket_seq(&self) -> DbResult<i64> {
        self.conn
            .execute("UPDATE bucket_sequence SET value = value + 1 WHERE id = 1", [])?;
        let seq = self
            .conn
            .query_row("SELECT value FROM bucket_sequence WHERE id = 1", [], |row| {
                row.get(0)
            })?;
        Ok(seq)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: i64,
    date: String,
    time: String,
    location: String,
    animal_type: String,
    animal_id: Option<String>,
    issue: String,
    notes: String,
    status: String,
    diagnosis: Option<String>,
    treatment: Option<String>,
    cancellation_reason: Option<String>,
    created_at: String,
    updated_at: String,
    farmer: FarmerSummary,
    vet: VetSummary,
}

impl AppointmentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AppointmentRow {
            id: row.get(0)?,
            date: row.get(1)?,
            time: row.get(2)?,
            location: row.get(3)?,
            animal_type: row.get(4)?,
            animal_id: row.get(5)?,
            issue: row.get(6)?,
            notes: row.get(7)?,
            status: row.get(8)?,
            diagnosis: row.get(9)?,
            treatment: row.get(10)?,
            cancellation_reason: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
            farmer: FarmerSummary {
                id: row.get(14)?,
                name: row.get(15)?,
                location: row.get(16)?,
                phone: row.get(17)?,
                avatar: row.get(18)?,
            },
            vet: VetSummary {
                id: row.get(19)?,
                name: row.get(20)?,
                specialty: row.get(21)?,
                avatar: row.get(22)?,
            },
        })
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = match string_to_bucket(&row.status)? {
            StatusBucket::Pending => AppointmentStatus::Pending,
            StatusBucket::Confirmed => AppointmentStatus::Confirmed,
            StatusBucket::Completed => AppointmentStatus::Completed {
                diagnosis: row.diagnosis.unwrap_or_default(),
                treatment: row.treatment.unwrap_or_default(),
            },
            StatusBucket::Cancelled => AppointmentStatus::Cancelled {
                reason: row.cancellation_reason.unwrap_or_default(),
            },
        };

        Ok(Appointment {
            id: row.id,
            farmer: row.farmer,
            vet: row.vet,
            date: parse_date_column(&row.date)?,
            time: parse_time_column(&row.time)?,
            location: row.location,
            animal_type: row.animal_type,
            animal_id: row.animal_id,
            issue: row.issue,
            notes: row.notes,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Split a status into its column values.
fn status_columns(
    status: &AppointmentStatus,
) -> (&'static str, Option<&str>, Option<&str>, Option<&str>) {
    match status {
        AppointmentStatus::Pending => ("pending", None, None, None),
        AppointmentStatus::Confirmed => ("confirmed", None, None, None),
        AppointmentStatus::Completed {
            diagnosis,
            treatment,
        } => (
            "completed",
            Some(diagnosis.as_str()),
            Some(treatment.as_str()),
            None,
        ),
        AppointmentStatus::Cancelled { reason } => ("cancelled", None, None, Some(reason.as_str())),
    }
}

fn string_to_bucket(s: &str) -> Result<StatusBucket, DbError> {
    StatusBucket::parse(s)
        .ok_or_else(|| DbError::Constraint(format!("Unknown appointment status: {}", s)))
}
