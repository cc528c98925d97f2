//! Vet availability database operations.

use chrono::{NaiveDate, Weekday};
use rusqlite::{params, OptionalExtension};

use super::{parse_date_column, parse_time_column, Database, DbError, DbResult};
use crate::models::{
    calendar, AvailabilitySettings, BookingPolicy, ServiceLocation, ServiceOffering, SpecialDate,
    WorkingHours,
};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl Database {
    /// Assemble the full availability settings for a vet.
    pub fn get_availability_settings(&self, vet_id: &str) -> DbResult<Option<AvailabilitySettings>> {
        let accepting_bookings: Option<bool> = self
            .conn
            .query_row(
                "SELECT accepting_bookings FROM vets WHERE id = ?",
                [vet_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(accepting_bookings) = accepting_bookings else {
            return Ok(None);
        };

        Ok(Some(AvailabilitySettings {
            vet_id: vet_id.to_string(),
            accepting_bookings,
            working_hours: self.list_working_hours(vet_id)?,
            locations: self.list_service_locations(vet_id)?,
            services: self.list_service_offerings(vet_id)?,
            special_dates: self.list_special_dates(vet_id)?,
            policy: self.get_booking_policy(vet_id)?.unwrap_or_default(),
        }))
    }

    /// Working hours, Monday first.
    pub fn list_working_hours(&self, vet_id: &str) -> DbResult<Vec<WorkingHours>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT weekday, start_time, end_time, enabled
               FROM working_hours WHERE vet_id = ? ORDER BY weekday"#,
        )?;
        let rows = stmt.query_map([vet_id], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
            ))
        })?;

        let mut hours = Vec::new();
        for row in rows {
            let (weekday, start, end, enabled) = row?;
            let weekday = WEEKDAYS
                .get(weekday as usize)
                .copied()
                .ok_or_else(|| DbError::Constraint(format!("Invalid weekday: {}", weekday)))?;
            hours.push(WorkingHours {
                weekday,
                start: parse_time_column(&start)?,
                end: parse_time_column(&end)?,
                enabled,
            });
        }
        Ok(hours)
    }

    /// Replace one weekday's hours.
    pub fn upsert_working_hours(&self, vet_id: &str, hours: &WorkingHours) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO working_hours (vet_id, weekday, start_time, end_time, enabled)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (vet_id, weekday) DO UPDATE SET
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                enabled = excluded.enabled
            "#,
            params![
                vet_id,
                hours.weekday.num_days_from_monday(),
                calendar::format_time_24h(hours.start),
                calendar::format_time_24h(hours.end),
                hours.enabled,
            ],
        )?;
        Ok(())
    }

    pub fn list_service_locations(&self, vet_id: &str) -> DbResult<Vec<ServiceLocation>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, name, radius_km, is_default
               FROM service_locations WHERE vet_id = ? ORDER BY id"#,
        )?;
        let rows = stmt.query_map([vet_id], |row| {
            Ok(ServiceLocation {
                id: row.get(0)?,
                name: row.get(1)?,
                radius_km: row.get(2)?,
                is_default: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a service location, returning its ID.
    pub fn insert_service_location(
        &self,
        vet_id: &str,
        name: &str,
        radius_km: u32,
        is_default: bool,
    ) -> DbResult<i64> {
        self.conn.execute(
            r#"INSERT INTO service_locations (vet_id, name, radius_km, is_default)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![vet_id, name, radius_km, is_default],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn delete_service_location(&self, vet_id: &str, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM service_locations WHERE vet_id = ?1 AND id = ?2",
            params![vet_id, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Make `id` the only default location for the vet.
    pub fn set_default_service_location(&self, vet_id: &str, id: i64) -> DbResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE service_locations SET is_default = (id = ?2) WHERE vet_id = ?1",
            params![vet_id, id],
        )?;
        let matched: i64 = tx.query_row(
            "SELECT COUNT(*) FROM service_locations WHERE vet_id = ?1 AND id = ?2",
            params![vet_id, id],
            |row| row.get(0),
        )?;
        if matched == 0 {
            // Dropping the transaction rolls back the cleared flags
            return Ok(false);
        }
        tx.commit()?;
        Ok(true)
    }

    pub fn list_service_offerings(&self, vet_id: &str) -> DbResult<Vec<ServiceOffering>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, name, duration_minutes, price_ugx
               FROM service_offerings WHERE vet_id = ? ORDER BY id"#,
        )?;
        let rows = stmt.query_map([vet_id], |row| {
            Ok(ServiceOffering {
                id: row.get(0)?,
                name: row.get(1)?,
                duration_minutes: row.get(2)?,
                price_ugx: row.get::<_, i64>(3)? as u64,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a service offering, returning its ID.
    pub fn insert_service_offering(
        &self,
        vet_id: &str,
        name: &str,
        duration_minutes: u32,
        price_ugx: u64,
    ) -> DbResult<i64> {
        let price = i64::try_from(price_ugx)
            .map_err(|_| DbError::Constraint(format!("Price out of range: {}", price_ugx)))?;
        self.conn.execute(
            r#"INSERT INTO service_offerings (vet_id, name, duration_minutes, price_ugx)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![vet_id, name, duration_minutes, price],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn delete_service_offering(&self, vet_id: &str, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM service_offerings WHERE vet_id = ?1 AND id = ?2",
            params![vet_id, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Special dates in calendar order.
    pub fn list_special_dates(&self, vet_id: &str) -> DbResult<Vec<SpecialDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, available, reason FROM special_dates WHERE vet_id = ? ORDER BY date",
        )?;
        let rows = stmt.query_map([vet_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, bool>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut dates = Vec::new();
        for row in rows {
            let (date, available, reason) = row?;
            dates.push(SpecialDate {
                date: parse_date_column(&date)?,
                available,
                reason,
            });
        }
        Ok(dates)
    }

    pub fn insert_special_date(&self, vet_id: &str, special: &SpecialDate) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO special_dates (vet_id, date, available, reason) VALUES (?1, ?2, ?3, ?4)",
            params![
                vet_id,
                calendar::format_date(special.date),
                special.available,
                special.reason,
            ],
        )?;
        Ok(())
    }

    pub fn delete_special_date(&self, vet_id: &str, date: NaiveDate) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM special_dates WHERE vet_id = ?1 AND date = ?2",
            params![vet_id, calendar::format_date(date)],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn get_booking_policy(&self, vet_id: &str) -> DbResult<Option<BookingPolicy>> {
        self.conn
            .query_row(
                r#"SELECT buffer_minutes, max_per_day, notice_hours
                   FROM booking_policies WHERE vet_id = ?"#,
                [vet_id],
                |row| {
                    Ok(BookingPolicy {
                        buffer_minutes: row.get(0)?,
                        max_per_day: row.get(1)?,
                        notice_hours: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn upsert_booking_policy(&self, vet_id: &str, policy: &BookingPolicy) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO booking_policies (vet_id, buffer_minutes, max_per_day, notice_hours)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (vet_id) DO UPDATE SET
                buffer_minutes = excluded.buffer_minutes,
                max_per_day = excluded.max_per_day,
                notice_hours = excluded.notice_hours
            "#,
            params![
                vet_id,
                policy.buffer_minutes,
                policy.max_per_day,
                policy.notice_hours,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vet;
    use chrono::NaiveTime;

    fn setup_db() -> (Database, Vet) {
        let db = Database::open_in_memory().unwrap();
        let vet = Vet::new("Dr. Mukasa".into(), "Large Animal".into(), "Kampala".into());
        db.insert_vet(&vet).unwrap();
        (db, vet)
    }

    #[test]
    fn test_settings_for_new_vet() {
        let (db, vet) = setup_db();

        let settings = db.get_availability_settings(&vet.id).unwrap().unwrap();
        assert!(settings.accepting_bookings);
        assert_eq!(settings.working_hours, WorkingHours::default_week());
        assert_eq!(settings.policy, BookingPolicy::default());
        assert!(settings.locations.is_empty());

        assert!(db.get_availability_settings("missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_working_hours() {
        let (db, vet) = setup_db();

        let sunday = WorkingHours {
            weekday: Weekday::Sun,
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            enabled: true,
        };
        db.upsert_working_hours(&vet.id, &sunday).unwrap();

        let hours = db.list_working_hours(&vet.id).unwrap();
        assert_eq!(hours.len(), 7);
        assert_eq!(hours[6], sunday);
    }

    #[test]
    fn test_default_location_is_exclusive() {
        let (db, vet) = setup_db();

        let kampala = db.insert_service_location(&vet.id, "Kampala Central", 15, true).unwrap();
        let wakiso = db.insert_service_location(&vet.id, "Wakiso District", 25, false).unwrap();

        assert!(db.set_default_service_location(&vet.id, wakiso).unwrap());
        let locations = db.list_service_locations(&vet.id).unwrap();
        let defaults: Vec<i64> = locations.iter().filter(|l| l.is_default).map(|l| l.id).collect();
        assert_eq!(defaults, vec![wakiso]);

        assert!(!db.set_default_service_location(&vet.id, 999).unwrap());
        assert!(db.list_service_locations(&vet.id).unwrap().iter().any(|l| l.is_default));

        assert!(db.delete_service_location(&vet.id, kampala).unwrap());
    }

    #[test]
    fn test_services_and_special_dates() {
        let (db, vet) = setup_db();

        let id = db.insert_service_offering(&vet.id, "General Checkup", 30, 50_000).unwrap();
        assert!(db.insert_service_offering(&vet.id, "Free", 30, 0).is_err());
        assert_eq!(db.list_service_offerings(&vet.id).unwrap()[0].price_ugx, 50_000);
        assert!(db.delete_service_offering(&vet.id, id).unwrap());

        let christmas = SpecialDate {
            date: calendar::parse_date("2023-12-25").unwrap(),
            available: false,
            reason: "Christmas Holiday".into(),
        };
        db.insert_special_date(&vet.id, &christmas).unwrap();
        assert!(db.insert_special_date(&vet.id, &christmas).is_err());
        assert_eq!(db.list_special_dates(&vet.id).unwrap(), vec![christmas.clone()]);
        assert!(db.delete_special_date(&vet.id, christmas.date).unwrap());
    }

    #[test]
    fn test_booking_policy_upsert() {
        let (db, vet) = setup_db();

        let policy = BookingPolicy {
            buffer_minutes: 45,
            max_per_day: 4,
            notice_hours: 24,
        };
        db.upsert_booking_policy(&vet.id, &policy).unwrap();
        assert_eq!(db.get_booking_policy(&vet.id).unwrap(), Some(policy));

        let invalid = BookingPolicy {
            max_per_day: 0,
            ..policy
        };
        assert!(db.upsert_booking_policy(&vet.id, &invalid).is_err());
    }
}
