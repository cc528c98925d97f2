//! Appointment booking and the status transition handlers.
//!
//! Every handler validates its confirmatory input before touching the
//! store, and checks the transition against [`AppointmentStatus::allows`].
//! A refused call leaves every bucket exactly as it was.

mod views;

pub use views::*;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::availability::{AvailabilityError, AvailabilityManager};
use crate::db::{Database, DbError};
use crate::models::{
    calendar, Acknowledged, Action, Appointment, AppointmentStatus, BookingRequest, FarmerBucket,
    Notice, Role, StatusBucket, StatusCounts,
};
use crate::validation::{is_blank, parse_date_input, parse_time_input, ValidationError};

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Appointment not found: {0}")]
    NotFound(i64),

    #[error("Farmer not found: {0}")]
    FarmerNotFound(String),

    #[error("Vet not found: {0}")]
    VetNotFound(String),

    #[error("Availability lookup failed: {0}")]
    Availability(#[from] AvailabilityError),

    #[error("Cannot {action} appointment {id} while {from}")]
    InvalidTransition {
        id: i64,
        from: &'static str,
        action: &'static str,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// The single appointment store as seen by both sides.
pub struct AppointmentBook<'a> {
    db: &'a Database,
    enforce_availability: bool,
}

impl<'a> AppointmentBook<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            enforce_availability: false,
        }
    }

    /// Check bookings and reschedules against the vet's hours, special
    /// dates and booking policy.
    pub fn with_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_availability = enforce;
        self
    }

    pub fn get(&self, id: i64) -> ScheduleResult<Appointment> {
        self.db.get_appointment(id)?.ok_or(ScheduleError::NotFound(id))
    }

    /// A farmer books a vet. The new appointment starts pending.
    pub fn book(
        &self,
        request: &BookingRequest,
        now: NaiveDateTime,
    ) -> ScheduleResult<Acknowledged<Appointment>> {
        if is_blank(&request.date) || is_blank(&request.time) {
            return Err(ValidationError::BookingDateTimeRequired.into());
        }
        let date = parse_date_input(&request.date)?;
        let time = parse_time_input(&request.time)?;

        let farmer = self
            .db
            .get_farmer(&request.farmer_id)?
            .ok_or_else(|| ScheduleError::FarmerNotFound(request.farmer_id.clone()))?;
        let vet = self
            .db
            .get_vet(&request.vet_id)?
            .ok_or_else(|| ScheduleError::VetNotFound(request.vet_id.clone()))?;

        if !vet.accepting_bookings {
            log::warn!("Refused booking with {}: not accepting bookings", vet.id);
            return Err(ValidationError::NotAcceptingBookings.into());
        }
        if self.enforce_availability {
            self.check_slot(&vet.id, date, time, now, None)?;
        }

        let timestamp = chrono::Utc::now().to_rfc3339();
        let mut appointment = Appointment {
            id: 0,
            farmer: farmer.summary(),
            vet: vet.summary(),
            date,
            time,
            location: request.location.trim().to_string(),
            animal_type: request.animal_type.trim().to_string(),
            animal_id: request
                .animal_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from),
            issue: request.issue.trim().to_string(),
            notes: request.notes.clone(),
            status: AppointmentStatus::Pending,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        appointment.id = self.db.insert_appointment(&appointment)?;
        log::info!(
            "Booked appointment {} for farmer {} with vet {} on {} {}",
            appointment.id,
            farmer.id,
            vet.id,
            date,
            calendar::format_time_24h(time)
        );

        let notice = Notice::new(
            "Appointment Booked!",
            format!(
                "Your appointment with {} on {} at {} is awaiting confirmation.",
                vet.name,
                calendar::format_date_long(date),
                calendar::format_time_12h(time)
            ),
        );
        Ok(Acknowledged::new(appointment, notice))
    }

    /// Vet accepts a pending request.
    pub fn accept(&self, id: i64) -> ScheduleResult<Acknowledged<Appointment>> {
        let appointment = self.get(id)?;
        self.ensure_allowed(&appointment, Action::Accept)?;

        let updated = self.move_to(id, AppointmentStatus::Confirmed)?;
        let notice = Notice::new(
            "Appointment Accepted",
            format!("You have accepted the appointment with {}.", updated.farmer.name),
        );
        Ok(Acknowledged::new(updated, notice))
    }

    /// Decline a pending request or cancel a confirmed visit. Either side
    /// may cancel; a reason is always required.
    pub fn cancel(
        &self,
        id: i64,
        reason: &str,
        by: Role,
    ) -> ScheduleResult<Acknowledged<Appointment>> {
        let appointment = self.get(id)?;
        if is_blank(reason) {
            log::warn!("Refused cancel of appointment {}: no reason", id);
            return Err(ValidationError::ReasonRequired.into());
        }
        self.ensure_allowed(&appointment, Action::Cancel)?;

        let updated = self.move_to(
            id,
            AppointmentStatus::Cancelled {
                reason: reason.trim().to_string(),
            },
        )?;
        let notice = match by {
            Role::Vet => Notice::new(
                "Appointment Cancelled",
                format!("The appointment with {} has been cancelled.", updated.farmer.name),
            ),
            Role::Farmer => Notice::new(
                "Appointment Cancelled",
                "Your appointment has been cancelled successfully.",
            ),
        };
        Ok(Acknowledged::new(updated, notice))
    }

    /// Vet completes a confirmed visit with its outcome.
    pub fn complete(
        &self,
        id: i64,
        diagnosis: &str,
        treatment: &str,
    ) -> ScheduleResult<Acknowledged<Appointment>> {
        let appointment = self.get(id)?;
        if is_blank(diagnosis) || is_blank(treatment) {
            log::warn!("Refused completion of appointment {}: missing outcome", id);
            return Err(ValidationError::CompletionInfoRequired.into());
        }
        self.ensure_allowed(&appointment, Action::Complete)?;

        let updated = self.move_to(
            id,
            AppointmentStatus::Completed {
                diagnosis: diagnosis.trim().to_string(),
                treatment: treatment.trim().to_string(),
            },
        )?;
        let notice = Notice::new(
            "Appointment Completed",
            format!(
                "The appointment with {} has been marked as completed.",
                updated.farmer.name
            ),
        );
        Ok(Acknowledged::new(updated, notice))
    }

    /// Move an open appointment to a new date and time. Its bucket and its
    /// place in the bucket are unchanged.
    pub fn reschedule(
        &self,
        id: i64,
        date: &str,
        time: &str,
        by: Role,
        now: NaiveDateTime,
    ) -> ScheduleResult<Acknowledged<Appointment>> {
        let appointment = self.get(id)?;
        if is_blank(date) || is_blank(time) {
            return Err(ValidationError::RescheduleDateTimeRequired.into());
        }
        let date = parse_date_input(date)?;
        let time = parse_time_input(time)?;
        self.ensure_allowed(&appointment, Action::Reschedule)?;

        if self.enforce_availability {
            self.check_slot(&appointment.vet.id, date, time, now, Some(id))?;
        }

        self.db.update_appointment_schedule(id, date, time)?;
        let updated = self.get(id)?;
        log::info!(
            "Rescheduled appointment {} to {} {}",
            id,
            date,
            calendar::format_time_24h(time)
        );

        let notice = match by {
            Role::Vet => Notice::new(
                "Appointment Rescheduled",
                format!("The appointment with {} has been rescheduled.", updated.farmer.name),
            ),
            Role::Farmer => Notice::new(
                "Appointment Rescheduled",
                format!(
                    "Your appointment has been rescheduled to {} at {}.",
                    calendar::format_date_long(date),
                    calendar::format_time_12h(time)
                ),
            ),
        };
        Ok(Acknowledged::new(updated, notice))
    }

    /// Replace the notes. Allowed in every state.
    pub fn edit_notes(&self, id: i64, notes: &str) -> ScheduleResult<Acknowledged<Appointment>> {
        let appointment = self.get(id)?;
        self.ensure_allowed(&appointment, Action::EditNotes)?;

        self.db.update_appointment_notes(id, notes)?;
        log::info!("Updated notes on appointment {}", id);

        let updated = self.get(id)?;
        let notice = Notice::new(
            "Notes Updated",
            "Your appointment notes have been updated successfully.",
        );
        Ok(Acknowledged::new(updated, notice))
    }

    /// One bucket of a vet's appointments, in bucket order.
    pub fn bucket(&self, vet_id: &str, bucket: StatusBucket) -> ScheduleResult<Vec<Appointment>> {
        Ok(self.db.list_vet_bucket(vet_id, bucket)?)
    }

    pub fn vet_view(&self, vet_id: &str) -> ScheduleResult<VetAppointmentView> {
        if self.db.get_vet(vet_id)?.is_none() {
            return Err(ScheduleError::VetNotFound(vet_id.to_string()));
        }
        Ok(VetAppointmentView {
            pending: self.bucket(vet_id, StatusBucket::Pending)?,
            confirmed: self.bucket(vet_id, StatusBucket::Confirmed)?,
            completed: self.bucket(vet_id, StatusBucket::Completed)?,
            cancelled: self.bucket(vet_id, StatusBucket::Cancelled)?,
        })
    }

    pub fn farmer_view(&self, farmer_id: &str) -> ScheduleResult<FarmerAppointmentView> {
        if self.db.get_farmer(farmer_id)?.is_none() {
            return Err(ScheduleError::FarmerNotFound(farmer_id.to_string()));
        }
        Ok(FarmerAppointmentView {
            upcoming: self
                .db
                .list_farmer_appointments(farmer_id, FarmerBucket::Upcoming.buckets())?,
            past: self
                .db
                .list_farmer_appointments(farmer_id, FarmerBucket::Past.buckets())?,
        })
    }

    pub fn status_counts(&self, vet_id: &str) -> ScheduleResult<StatusCounts> {
        Ok(self.db.appointment_status_counts(vet_id)?)
    }

    fn ensure_allowed(&self, appointment: &Appointment, action: Action) -> ScheduleResult<()> {
        if appointment.status.allows(action) {
            return Ok(());
        }
        log::warn!(
            "Refused {} on appointment {} in {}",
            action.as_str(),
            appointment.id,
            appointment.bucket().as_str()
        );
        Err(ScheduleError::InvalidTransition {
            id: appointment.id,
            from: appointment.bucket().as_str(),
            action: action.as_str(),
        })
    }

    fn move_to(&self, id: i64, status: AppointmentStatus) -> ScheduleResult<Appointment> {
        let bucket = status.bucket();
        if !self.db.update_appointment_status(id, &status)? {
            return Err(ScheduleError::NotFound(id));
        }
        log::info!("Appointment {} moved to {}", id, bucket.as_str());
        self.get(id)
    }

    fn check_slot(
        &self,
        vet_id: &str,
        date: chrono::NaiveDate,
        time: chrono::NaiveTime,
        now: NaiveDateTime,
        exclude: Option<i64>,
    ) -> ScheduleResult<()> {
        let verdict = AvailabilityManager::new(self.db).check(vet_id, date, time, now, exclude)?;
        verdict.map_err(|violation| {
            log::warn!("Refused slot {} {} with {}: {}", date, time, vet_id, violation);
            ScheduleError::Validation(ValidationError::SlotUnavailable(violation))
        })
    }
}
