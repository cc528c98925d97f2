//! Vet availability management.
//!
//! Working hours, service locations, priced services, special dates and the
//! booking policy scalars. Bookings are checked against these settings with
//! [`check_slot`] when enforcement is configured.

mod policy;

pub use policy::*;

use chrono::{NaiveDate, NaiveTime, Weekday};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{
    calendar, Acknowledged, AvailabilitySettings, BookingPolicy, Notice, ServiceLocation,
    ServiceOffering, SpecialDate, WorkingHours,
};
use crate::validation::{is_blank, parse_date_input, parse_time_input, ValidationError};

/// Default travel radius for a new service location.
pub const DEFAULT_RADIUS_KM: u32 = 15;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Vet not found: {0}")]
    VetNotFound(String),

    #[error("Service location not found: {0}")]
    LocationNotFound(i64),

    #[error("Service not found: {0}")]
    ServiceNotFound(i64),

    #[error("Special date not found: {0}")]
    SpecialDateNotFound(String),
}

pub type AvailabilityResult<T> = Result<T, AvailabilityError>;

pub struct AvailabilityManager<'a> {
    db: &'a Database,
}

impl<'a> AvailabilityManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn settings(&self, vet_id: &str) -> AvailabilityResult<AvailabilitySettings> {
        self.db
            .get_availability_settings(vet_id)?
            .ok_or_else(|| AvailabilityError::VetNotFound(vet_id.to_string()))
    }

    /// Switch bookings on or off.
    pub fn set_accepting_bookings(
        &self,
        vet_id: &str,
        accepting: bool,
    ) -> AvailabilityResult<Acknowledged<bool>> {
        if !self.db.set_accepting_bookings(vet_id, accepting)? {
            return Err(AvailabilityError::VetNotFound(vet_id.to_string()));
        }
        log::info!("Vet {} accepting bookings: {}", vet_id, accepting);

        let notice = if accepting {
            Notice::new(
                "You are now available",
                "Farmers can now book appointments with you.",
            )
        } else {
            Notice::new(
                "You are now unavailable",
                "Farmers will not be able to book new appointments with you.",
            )
        };
        Ok(Acknowledged::new(accepting, notice))
    }

    /// Replace one weekday's hours. Enabled hours must start before they end.
    pub fn update_hours(
        &self,
        vet_id: &str,
        weekday: Weekday,
        start: &str,
        end: &str,
        enabled: bool,
    ) -> AvailabilityResult<Acknowledged<WorkingHours>> {
        self.require_vet(vet_id)?;

        let hours = WorkingHours {
            weekday,
            start: parse_time_input(start)?,
            end: parse_time_input(end)?,
            enabled,
        };
        if hours.enabled && hours.start >= hours.end {
            log::warn!("Refused hours {}-{} for {}", start, end, weekday);
            return Err(ValidationError::InvalidHours.into());
        }

        self.db.upsert_working_hours(vet_id, &hours)?;
        log::info!("Updated {} hours for vet {}", weekday, vet_id);
        Ok(Acknowledged::new(hours, settings_saved()))
    }

    /// Add a service location. The first location becomes the default.
    pub fn add_location(
        &self,
        vet_id: &str,
        name: &str,
        radius_km: Option<u32>,
    ) -> AvailabilityResult<Acknowledged<ServiceLocation>> {
        if is_blank(name) {
            return Err(ValidationError::LocationNameRequired.into());
        }
        self.require_vet(vet_id)?;

        let is_default = self.db.list_service_locations(vet_id)?.is_empty();
        let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        let name = name.trim();
        let id = self
            .db
            .insert_service_location(vet_id, name, radius_km, is_default)?;
        log::info!("Added location {} ({}) for vet {}", id, name, vet_id);

        Ok(Acknowledged::new(
            ServiceLocation {
                id,
                name: name.to_string(),
                radius_km,
                is_default,
            },
            Notice::new(
                "Location added",
                format!("{} has been added to your service locations.", name),
            ),
        ))
    }

    /// Remove a location. The last one cannot be removed; removing the
    /// default promotes the first remaining location.
    pub fn remove_location(&self, vet_id: &str, location_id: i64) -> AvailabilityResult<Notice> {
        let locations = self.db.list_service_locations(vet_id)?;
        let removed = locations
            .iter()
            .find(|l| l.id == location_id)
            .ok_or(AvailabilityError::LocationNotFound(location_id))?;
        if locations.len() <= 1 {
            log::warn!("Refused to remove last location of vet {}", vet_id);
            return Err(ValidationError::LastLocation.into());
        }

        self.db.delete_service_location(vet_id, location_id)?;
        if removed.is_default {
            if let Some(next) = locations.iter().find(|l| l.id != location_id) {
                self.db.set_default_service_location(vet_id, next.id)?;
            }
        }
        log::info!("Removed location {} for vet {}", location_id, vet_id);

        Ok(Notice::new(
            "Location removed",
            "The location has been removed from your service locations.",
        ))
    }

    pub fn set_default_location(&self, vet_id: &str, location_id: i64) -> AvailabilityResult<Notice> {
        if !self.db.set_default_service_location(vet_id, location_id)? {
            return Err(AvailabilityError::LocationNotFound(location_id));
        }
        log::info!("Default location for vet {} is now {}", vet_id, location_id);
        Ok(Notice::new(
            "Default location updated",
            "Your default service location has been updated.",
        ))
    }

    pub fn add_service(
        &self,
        vet_id: &str,
        name: &str,
        duration_minutes: u32,
        price_ugx: u64,
    ) -> AvailabilityResult<Acknowledged<ServiceOffering>> {
        if is_blank(name) {
            return Err(ValidationError::ServiceNameRequired.into());
        }
        if duration_minutes == 0 {
            return Err(ValidationError::InvalidDuration.into());
        }
        if price_ugx == 0 {
            return Err(ValidationError::InvalidPrice.into());
        }
        self.require_vet(vet_id)?;

        let name = name.trim();
        let id = self
            .db
            .insert_service_offering(vet_id, name, duration_minutes, price_ugx)?;
        log::info!("Added service {} ({}) for vet {}", id, name, vet_id);

        Ok(Acknowledged::new(
            ServiceOffering {
                id,
                name: name.to_string(),
                duration_minutes,
                price_ugx,
            },
            Notice::new("Service added", format!("{} has been added to your services.", name)),
        ))
    }

    pub fn remove_service(&self, vet_id: &str, service_id: i64) -> AvailabilityResult<Notice> {
        if !self.db.delete_service_offering(vet_id, service_id)? {
            return Err(AvailabilityError::ServiceNotFound(service_id));
        }
        log::info!("Removed service {} for vet {}", service_id, vet_id);
        Ok(Notice::new(
            "Service removed",
            "The service has been removed from your offerings.",
        ))
    }

    /// Add a calendar override. One entry per date.
    pub fn add_special_date(
        &self,
        vet_id: &str,
        date: &str,
        available: bool,
        reason: &str,
    ) -> AvailabilityResult<Acknowledged<SpecialDate>> {
        if is_blank(date) {
            return Err(ValidationError::SpecialDateRequired.into());
        }
        if is_blank(reason) {
            return Err(ValidationError::SpecialDateReasonRequired.into());
        }
        let date = parse_date_input(date)?;
        self.require_vet(vet_id)?;

        if self
            .db
            .list_special_dates(vet_id)?
            .iter()
            .any(|d| d.date == date)
        {
            return Err(ValidationError::DuplicateSpecialDate(calendar::format_date(date)).into());
        }

        let special = SpecialDate {
            date,
            available,
            reason: reason.trim().to_string(),
        };
        self.db.insert_special_date(vet_id, &special)?;
        log::info!("Added special date {} for vet {}", date, vet_id);

        let notice = Notice::new(
            "Special date added",
            format!("{} has been added to your calendar.", date.format("%a %b %d %Y")),
        );
        Ok(Acknowledged::new(special, notice))
    }

    pub fn remove_special_date(&self, vet_id: &str, date: NaiveDate) -> AvailabilityResult<Notice> {
        if !self.db.delete_special_date(vet_id, date)? {
            return Err(AvailabilityError::SpecialDateNotFound(calendar::format_date(date)));
        }
        log::info!("Removed special date {} for vet {}", date, vet_id);
        Ok(Notice::new(
            "Special date removed",
            "The date has been removed from your special dates.",
        ))
    }

    /// Replace the buffer, daily maximum and notice scalars.
    pub fn update_policy(
        &self,
        vet_id: &str,
        policy: BookingPolicy,
    ) -> AvailabilityResult<Acknowledged<BookingPolicy>> {
        if policy.max_per_day < 1 {
            return Err(ValidationError::InvalidDailyLimit.into());
        }
        self.require_vet(vet_id)?;

        self.db.upsert_booking_policy(vet_id, &policy)?;
        log::info!("Updated booking policy for vet {}: {:?}", vet_id, policy);
        Ok(Acknowledged::new(policy, settings_saved()))
    }

    /// Check a slot against the vet's current settings and open appointments.
    pub fn check(
        &self,
        vet_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        now: chrono::NaiveDateTime,
        exclude_appointment: Option<i64>,
    ) -> AvailabilityResult<Result<(), crate::models::PolicyViolation>> {
        let settings = self.settings(vet_id)?;
        let mut open = self.db.list_open_appointments_on(vet_id, date)?;
        if let Some(id) = exclude_appointment {
            open.retain(|a| a.id != id);
        }
        Ok(check_slot(&settings, &open, date, time, now))
    }

    fn require_vet(&self, vet_id: &str) -> AvailabilityResult<()> {
        match self.db.get_vet(vet_id)? {
            Some(_) => Ok(()),
            None => Err(AvailabilityError::VetNotFound(vet_id.to_string())),
        }
    }
}

fn settings_saved() -> Notice {
    Notice::new(
        "Settings saved",
        "Your availability settings have been updated successfully.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vet;

    fn setup() -> (Database, Vet) {
        let db = Database::open_in_memory().unwrap();
        let vet = Vet::new("Dr. Joseph Mukasa".into(), "Large Animal".into(), "Kampala".into());
        db.insert_vet(&vet).unwrap();
        (db, vet)
    }

    #[test]
    fn test_toggle_accepting() {
        let (db, vet) = setup();
        let manager = AvailabilityManager::new(&db);

        let ack = manager.set_accepting_bookings(&vet.id, false).unwrap();
        assert_eq!(ack.notice.title, "You are now unavailable");
        assert!(!manager.settings(&vet.id).unwrap().accepting_bookings);

        assert!(matches!(
            manager.set_accepting_bookings("missing", true),
            Err(AvailabilityError::VetNotFound(_))
        ));
    }

    #[test]
    fn test_hours_must_be_ordered() {
        let (db, vet) = setup();
        let manager = AvailabilityManager::new(&db);

        assert!(matches!(
            manager.update_hours(&vet.id, Weekday::Mon, "17:00", "09:00", true),
            Err(AvailabilityError::Validation(ValidationError::InvalidHours))
        ));
        // Disabled days may carry any times
        manager
            .update_hours(&vet.id, Weekday::Mon, "00:00", "00:00", false)
            .unwrap();
        let ack = manager
            .update_hours(&vet.id, Weekday::Sun, "8:00 AM", "12:00 PM", true)
            .unwrap();
        assert_eq!(ack.value.end, NaiveTime::from_hms_opt(12, 0, 0).unwrap());

        let settings = manager.settings(&vet.id).unwrap();
        assert!(!settings.hours_for(Weekday::Mon).unwrap().enabled);
        assert!(settings.hours_for(Weekday::Sun).unwrap().enabled);
    }

    #[test]
    fn test_location_lifecycle() {
        let (db, vet) = setup();
        let manager = AvailabilityManager::new(&db);

        assert!(matches!(
            manager.add_location(&vet.id, "  ", None),
            Err(AvailabilityError::Validation(ValidationError::LocationNameRequired))
        ));

        let kampala = manager.add_location(&vet.id, "Kampala Central", None).unwrap().value;
        let wakiso = manager.add_location(&vet.id, "Wakiso District", Some(25)).unwrap().value;
        assert!(kampala.is_default);
        assert!(!wakiso.is_default);
        assert_eq!(kampala.radius_km, DEFAULT_RADIUS_KM);

        manager.remove_location(&vet.id, kampala.id).unwrap();
        let settings = manager.settings(&vet.id).unwrap();
        assert_eq!(settings.default_location().unwrap().id, wakiso.id);

        assert!(matches!(
            manager.remove_location(&vet.id, wakiso.id),
            Err(AvailabilityError::Validation(ValidationError::LastLocation))
        ));
    }

    #[test]
    fn test_service_validation() {
        let (db, vet) = setup();
        let manager = AvailabilityManager::new(&db);

        assert!(manager.add_service(&vet.id, "", 30, 50_000).is_err());
        assert!(manager.add_service(&vet.id, "Checkup", 0, 50_000).is_err());
        assert!(manager.add_service(&vet.id, "Checkup", 30, 0).is_err());

        let ack = manager.add_service(&vet.id, "General Checkup", 30, 50_000).unwrap();
        assert_eq!(ack.notice.description, "General Checkup has been added to your services.");
        manager.remove_service(&vet.id, ack.value.id).unwrap();
        assert!(matches!(
            manager.remove_service(&vet.id, ack.value.id),
            Err(AvailabilityError::ServiceNotFound(_))
        ));
    }

    #[test]
    fn test_special_dates() {
        let (db, vet) = setup();
        let manager = AvailabilityManager::new(&db);

        assert!(matches!(
            manager.add_special_date(&vet.id, "2023-12-25", false, ""),
            Err(AvailabilityError::Validation(ValidationError::SpecialDateReasonRequired))
        ));
        let ack = manager
            .add_special_date(&vet.id, "2023-12-25", false, "Christmas Holiday")
            .unwrap();
        assert_eq!(ack.notice.description, "Mon Dec 25 2023 has been added to your calendar.");
        assert!(matches!(
            manager.add_special_date(&vet.id, "2023-12-25", true, "Open after all"),
            Err(AvailabilityError::Validation(ValidationError::DuplicateSpecialDate(_)))
        ));

        manager.remove_special_date(&vet.id, ack.value.date).unwrap();
        assert!(manager.settings(&vet.id).unwrap().special_dates.is_empty());
    }

    #[test]
    fn test_policy_limit() {
        let (db, vet) = setup();
        let manager = AvailabilityManager::new(&db);

        let invalid = BookingPolicy {
            max_per_day: 0,
            ..BookingPolicy::default()
        };
        assert!(manager.update_policy(&vet.id, invalid).is_err());

        let policy = BookingPolicy {
            buffer_minutes: 60,
            max_per_day: 3,
            notice_hours: 24,
        };
        manager.update_policy(&vet.id, policy).unwrap();
        assert_eq!(manager.settings(&vet.id).unwrap().policy, policy);
    }
}
