//! Vetco Core Library
//!
//! Domain core of a two-sided livestock marketplace: farmers book vets,
//! message them and keep health records; vets manage appointments and
//! their availability.
//!
//! # Architecture
//!
//! ```text
//!   Farmer views                                  Vet views
//!        │                                             │
//!        └──────────────────┐        ┌─────────────────┘
//!                           ▼        ▼
//!                     ┌──────────────────┐
//!                     │    VetcoCore     │  (FFI facade)
//!                     └────────┬─────────┘
//!                              │
//!    scheduling · records · messaging · availability · directory · knowledge
//!                              │
//!                     ┌────────▼─────────┐
//!                     │  Database (one   │
//!                     │  SQLite store)   │
//!                     └──────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **One source of truth.** Both sides read and write the same rows; the
//! farmer's upcoming/past tabs are a projection of the vet's four status
//! buckets, never a copy.
//!
//! # Modules
//!
//! - [`db`]: SQLite repository for every entity collection
//! - [`models`]: Domain types (Appointment, Animal, Conversation, etc.)
//! - [`scheduling`]: Booking and appointment status transitions
//! - [`records`]: Animal registry and health records
//! - [`messaging`]: Conversations and scheduled auto-replies
//! - [`availability`]: Working hours, locations, services, booking policy
//! - [`directory`]: Vet search and per-farmer preferences
//! - [`knowledge`]: Disease reference entries

pub mod availability;
pub mod config;
pub mod db;
pub mod directory;
pub mod ffi;
pub mod knowledge;
pub mod messaging;
pub mod models;
pub mod records;
pub mod scheduling;
pub mod seed;
pub mod validation;

// Re-export commonly used types
pub use availability::AvailabilityManager;
pub use config::VetcoConfig;
pub use db::Database;
pub use directory::VetDirectory;
pub use knowledge::KnowledgeHub;
pub use messaging::Messenger;
pub use models::{
    Acknowledged, Animal, Appointment, AppointmentStatus, HealthRecord, Notice, Role,
    StatusBucket,
};
pub use records::Registry;
pub use scheduling::AppointmentBook;
pub use validation::ValidationError;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Local, TimeZone, Utc, Weekday};

use ffi::*;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VetcoError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A refused user input, carrying the notice to show.
    #[error("{title}: {description}")]
    Validation { title: String, description: String },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for VetcoError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => VetcoError::NotFound(what),
            other => VetcoError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ValidationError> for VetcoError {
    fn from(e: ValidationError) -> Self {
        let notice = e.notice();
        VetcoError::Validation {
            title: notice.title,
            description: notice.description,
        }
    }
}

impl From<scheduling::ScheduleError> for VetcoError {
    fn from(e: scheduling::ScheduleError) -> Self {
        use scheduling::ScheduleError::*;
        match e {
            Database(e) => e.into(),
            Validation(e) => e.into(),
            Availability(e) => e.into(),
            e @ InvalidTransition { .. } => VetcoError::InvalidTransition(e.to_string()),
            e => VetcoError::NotFound(e.to_string()),
        }
    }
}

impl From<records::RegistryError> for VetcoError {
    fn from(e: records::RegistryError) -> Self {
        use records::RegistryError::*;
        match e {
            Database(e) => e.into(),
            Validation(e) => e.into(),
            e => VetcoError::NotFound(e.to_string()),
        }
    }
}

impl From<messaging::MessagingError> for VetcoError {
    fn from(e: messaging::MessagingError) -> Self {
        match e {
            messaging::MessagingError::Database(e) => e.into(),
            e => VetcoError::NotFound(e.to_string()),
        }
    }
}

impl From<availability::AvailabilityError> for VetcoError {
    fn from(e: availability::AvailabilityError) -> Self {
        use availability::AvailabilityError::*;
        match e {
            Database(e) => e.into(),
            Validation(e) => e.into(),
            e => VetcoError::NotFound(e.to_string()),
        }
    }
}

impl From<directory::DirectoryError> for VetcoError {
    fn from(e: directory::DirectoryError) -> Self {
        match e {
            directory::DirectoryError::Database(e) => e.into(),
            e => VetcoError::NotFound(e.to_string()),
        }
    }
}

impl From<knowledge::KnowledgeError> for VetcoError {
    fn from(e: knowledge::KnowledgeError) -> Self {
        use knowledge::KnowledgeError::*;
        match e {
            Database(e) => e.into(),
            Validation(e) => e.into(),
            e => VetcoError::NotFound(e.to_string()),
        }
    }
}

impl From<::config::ConfigError> for VetcoError {
    fn from(e: ::config::ConfigError) -> Self {
        VetcoError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for VetcoError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VetcoError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_role(role: &str) -> Result<Role, VetcoError> {
    Role::parse(role).ok_or_else(|| VetcoError::InvalidInput(format!("Unknown role: {}", role)))
}

fn parse_weekday(weekday: &str) -> Result<Weekday, VetcoError> {
    weekday
        .trim()
        .parse::<Weekday>()
        .map_err(|_| VetcoError::InvalidInput(format!("Unknown weekday: {}", weekday)))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the core with configuration from an optional TOML file and the
/// `VETCO_*` environment.
#[uniffi::export]
pub fn open_vetco(config_path: Option<String>) -> Result<Arc<VetcoCore>, VetcoError> {
    let config = VetcoConfig::load(config_path.as_deref().map(Path::new))?;
    Ok(Arc::new(VetcoCore::from_config(config)?))
}

/// Create an empty in-memory core with default configuration.
#[uniffi::export]
pub fn open_vetco_in_memory() -> Result<Arc<VetcoCore>, VetcoError> {
    Ok(Arc::new(VetcoCore::from_config(VetcoConfig::default())?))
}

/// Create an in-memory core loaded with the demo data set.
#[uniffi::export]
pub fn open_vetco_demo() -> Result<Arc<VetcoCore>, VetcoError> {
    let mut config = VetcoConfig::default();
    config.database.seed_demo_data = true;
    Ok(Arc::new(VetcoCore::from_config(config)?))
}

/// Format a price in Ugandan shillings, e.g. "UGX 50,000".
#[uniffi::export]
pub fn format_price(price_ugx: u64) -> String {
    models::format_price_ugx(price_ugx)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe facade shared by the farmer and vet views.
#[derive(uniffi::Object)]
pub struct VetcoCore {
    db: Arc<Mutex<Database>>,
    config: VetcoConfig,
}

impl VetcoCore {
    pub fn from_config(config: VetcoConfig) -> Result<Self, VetcoError> {
        let db = match &config.database.path {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        if config.database.seed_demo_data {
            seed::load_demo_data(&db)?;
        }
        log::info!(
            "Opened Vetco core ({})",
            config.database.path.as_deref().unwrap_or("in-memory")
        );
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        })
    }

    pub fn config(&self) -> &VetcoConfig {
        &self.config
    }

    fn appointment_book<'a>(&self, db: &'a Database) -> AppointmentBook<'a> {
        AppointmentBook::new(db).with_enforcement(self.config.booking.enforce_availability)
    }
}

#[uniffi::export]
impl VetcoCore {
    // =========================================================================
    // Parties
    // =========================================================================

    pub fn list_farmers(&self) -> Result<Vec<FfiFarmer>, VetcoError> {
        let db = self.db.lock()?;
        Ok(db.list_farmers()?.into_iter().map(Into::into).collect())
    }

    pub fn get_farmer(&self, farmer_id: String) -> Result<Option<FfiFarmer>, VetcoError> {
        let db = self.db.lock()?;
        Ok(db.get_farmer(&farmer_id)?.map(Into::into))
    }

    pub fn list_vets(&self) -> Result<Vec<FfiVet>, VetcoError> {
        let db = self.db.lock()?;
        Ok(db.list_vets()?.into_iter().map(Into::into).collect())
    }

    pub fn get_vet(&self, vet_id: String) -> Result<Option<FfiVet>, VetcoError> {
        let db = self.db.lock()?;
        Ok(db.get_vet(&vet_id)?.map(Into::into))
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    /// Book a vet. The new appointment starts pending.
    pub fn book_appointment(
        &self,
        request: FfiBookingRequest,
    ) -> Result<FfiAppointmentResult, VetcoError> {
        let db = self.db.lock()?;
        let ack = self
            .appointment_book(&db)
            .book(&request.into(), Local::now().naive_local())?;
        Ok(FfiAppointmentResult::new(ack, Role::Farmer))
    }

    pub fn get_appointment(&self, id: i64, viewer: String) -> Result<FfiAppointment, VetcoError> {
        let viewer = parse_role(&viewer)?;
        let db = self.db.lock()?;
        let appointment = self.appointment_book(&db).get(id)?;
        Ok(FfiAppointment::for_viewer(appointment, viewer))
    }

    pub fn accept_appointment(&self, id: i64) -> Result<FfiAppointmentResult, VetcoError> {
        let db = self.db.lock()?;
        let ack = self.appointment_book(&db).accept(id)?;
        Ok(FfiAppointmentResult::new(ack, Role::Vet))
    }

    /// Decline (vet, while pending) or cancel (either side).
    pub fn cancel_appointment(
        &self,
        id: i64,
        reason: String,
        by: String,
    ) -> Result<FfiAppointmentResult, VetcoError> {
        let by = parse_role(&by)?;
        let db = self.db.lock()?;
        let ack = self.appointment_book(&db).cancel(id, &reason, by)?;
        Ok(FfiAppointmentResult::new(ack, by))
    }

    pub fn complete_appointment(
        &self,
        id: i64,
        diagnosis: String,
        treatment: String,
    ) -> Result<FfiAppointmentResult, VetcoError> {
        let db = self.db.lock()?;
        let ack = self
            .appointment_book(&db)
            .complete(id, &diagnosis, &treatment)?;
        Ok(FfiAppointmentResult::new(ack, Role::Vet))
    }

    pub fn reschedule_appointment(
        &self,
        id: i64,
        date: String,
        time: String,
        by: String,
    ) -> Result<FfiAppointmentResult, VetcoError> {
        let by = parse_role(&by)?;
        let db = self.db.lock()?;
        let ack = self.appointment_book(&db).reschedule(
            id,
            &date,
            &time,
            by,
            Local::now().naive_local(),
        )?;
        Ok(FfiAppointmentResult::new(ack, by))
    }

    /// Replace the notes from either side's appointment screen.
    pub fn edit_appointment_notes(
        &self,
        id: i64,
        notes: String,
        by: String,
    ) -> Result<FfiAppointmentResult, VetcoError> {
        let by = parse_role(&by)?;
        let db = self.db.lock()?;
        let ack = self.appointment_book(&db).edit_notes(id, &notes)?;
        Ok(FfiAppointmentResult::new(ack, by))
    }

    /// The vet's pending/confirmed/completed/cancelled tabs.
    pub fn vet_appointments(&self, vet_id: String) -> Result<FfiVetAppointments, VetcoError> {
        let db = self.db.lock()?;
        Ok(self.appointment_book(&db).vet_view(&vet_id)?.into())
    }

    /// Appointments in any of the vet's tabs matching farmer, animal or issue.
    pub fn search_vet_appointments(
        &self,
        vet_id: String,
        term: String,
    ) -> Result<Vec<FfiAppointment>, VetcoError> {
        let db = self.db.lock()?;
        let view = self.appointment_book(&db).vet_view(&vet_id)?;
        Ok(view
            .search(&term)
            .into_iter()
            .cloned()
            .map(|a| FfiAppointment::for_viewer(a, Role::Vet))
            .collect())
    }

    /// The farmer's upcoming/past tabs.
    pub fn farmer_appointments(
        &self,
        farmer_id: String,
    ) -> Result<FfiFarmerAppointments, VetcoError> {
        let db = self.db.lock()?;
        Ok(self.appointment_book(&db).farmer_view(&farmer_id)?.into())
    }

    pub fn appointment_status_counts(&self, vet_id: String) -> Result<FfiStatusCounts, VetcoError> {
        let db = self.db.lock()?;
        Ok(self.appointment_book(&db).status_counts(&vet_id)?.into())
    }

    // =========================================================================
    // Health registry
    // =========================================================================

    pub fn list_animals(&self, farmer_id: String) -> Result<Vec<FfiAnimal>, VetcoError> {
        let db = self.db.lock()?;
        let animals = Registry::new(&db).animals(&farmer_id)?;
        Ok(animals.into_iter().map(Into::into).collect())
    }

    /// An unused `ANIMAL-NNN` tag for the add-animal form.
    pub fn suggest_animal_id(&self) -> Result<String, VetcoError> {
        let db = self.db.lock()?;
        Ok(Registry::new(&db).suggest_animal_id(&mut rand::thread_rng())?)
    }

    pub fn add_animal(
        &self,
        farmer_id: String,
        input: FfiAnimalInput,
    ) -> Result<FfiAnimalResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(Registry::new(&db)
            .add_animal(&farmer_id, &input.into())?
            .into())
    }

    pub fn edit_animal(&self, input: FfiAnimalInput) -> Result<FfiAnimalResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(Registry::new(&db).edit_animal(&input.into())?.into())
    }

    pub fn delete_animal(&self, animal_id: String) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        Ok(Registry::new(&db).delete_animal(&animal_id)?.into())
    }

    pub fn list_health_records(&self, farmer_id: String) -> Result<Vec<FfiHealthRecord>, VetcoError> {
        let db = self.db.lock()?;
        let records = Registry::new(&db).records(&farmer_id)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub fn records_for_animal(&self, animal_id: String) -> Result<Vec<FfiHealthRecord>, VetcoError> {
        let db = self.db.lock()?;
        let records = Registry::new(&db).records_for_animal(&animal_id)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub fn add_health_record(&self, input: FfiRecordInput) -> Result<FfiRecordResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(Registry::new(&db).add_record(&input.into())?.into())
    }

    pub fn edit_health_record(
        &self,
        record_id: i64,
        input: FfiRecordInput,
    ) -> Result<FfiRecordResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(Registry::new(&db)
            .edit_record(record_id, &input.into())?
            .into())
    }

    pub fn delete_health_record(&self, record_id: i64) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        Ok(Registry::new(&db).delete_record(record_id)?.into())
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Conversations for one side, filtered by counterpart name or last message.
    pub fn list_conversations(
        &self,
        viewer: String,
        party_id: String,
        term: String,
    ) -> Result<Vec<FfiConversation>, VetcoError> {
        let viewer = parse_role(&viewer)?;
        let db = self.db.lock()?;
        let conversations = Messenger::new(&db, &self.config.messaging).conversations(
            viewer,
            &party_id,
            &term,
        )?;
        Ok(conversations
            .into_iter()
            .map(|c| FfiConversation::for_viewer(c, viewer))
            .collect())
    }

    /// Open a conversation, marking it read for `viewer`.
    pub fn open_conversation(
        &self,
        conversation_id: i64,
        viewer: String,
    ) -> Result<FfiThread, VetcoError> {
        let viewer = parse_role(&viewer)?;
        let db = self.db.lock()?;
        let thread = Messenger::new(&db, &self.config.messaging).open(conversation_id, viewer)?;
        Ok(FfiThread::for_viewer(thread, viewer))
    }

    /// Open (creating if needed) the conversation between a farmer and a vet.
    pub fn open_conversation_with(
        &self,
        farmer_id: String,
        vet_id: String,
        viewer: String,
    ) -> Result<FfiThread, VetcoError> {
        let viewer = parse_role(&viewer)?;
        let db = self.db.lock()?;
        let thread =
            Messenger::new(&db, &self.config.messaging).open_with(&farmer_id, &vet_id, viewer)?;
        Ok(FfiThread::for_viewer(thread, viewer))
    }

    /// Send a message. Blank text is ignored and returns `None`.
    pub fn send_message(
        &self,
        conversation_id: i64,
        sender: String,
        text: String,
    ) -> Result<Option<FfiSentMessage>, VetcoError> {
        let sender = parse_role(&sender)?;
        let db = self.db.lock()?;
        let sent = Messenger::new(&db, &self.config.messaging).send(
            conversation_id,
            sender,
            &text,
            Utc::now(),
        )?;
        Ok(sent.map(Into::into))
    }

    /// Append every scheduled reply that is due now.
    pub fn deliver_due_replies(&self) -> Result<Vec<FfiMessage>, VetcoError> {
        self.deliver_due_replies_at(Utc::now().timestamp_millis())
    }

    /// Append every scheduled reply due at `now_ms` (Unix milliseconds).
    pub fn deliver_due_replies_at(&self, now_ms: i64) -> Result<Vec<FfiMessage>, VetcoError> {
        let now = Utc
            .timestamp_millis_opt(now_ms)
            .single()
            .ok_or_else(|| VetcoError::InvalidInput(format!("Bad timestamp: {}", now_ms)))?;
        let db = self.db.lock()?;
        let delivered = Messenger::new(&db, &self.config.messaging).deliver_due_replies(now)?;
        Ok(delivered.into_iter().map(Into::into).collect())
    }

    pub fn unread_count(&self, viewer: String, party_id: String) -> Result<u32, VetcoError> {
        let viewer = parse_role(&viewer)?;
        let db = self.db.lock()?;
        let count = Messenger::new(&db, &self.config.messaging).unread_count(viewer, &party_id)?;
        Ok(count as u32)
    }

    // =========================================================================
    // Availability
    // =========================================================================

    pub fn availability(&self, vet_id: String) -> Result<FfiAvailability, VetcoError> {
        let db = self.db.lock()?;
        Ok(AvailabilityManager::new(&db).settings(&vet_id)?.into())
    }

    pub fn set_accepting_bookings(
        &self,
        vet_id: String,
        accepting: bool,
    ) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        let ack = AvailabilityManager::new(&db).set_accepting_bookings(&vet_id, accepting)?;
        Ok(ack.notice.into())
    }

    /// Update one weekday ("Monday", "Mon", ...).
    pub fn update_working_hours(
        &self,
        vet_id: String,
        weekday: String,
        start: String,
        end: String,
        enabled: bool,
    ) -> Result<FfiNotice, VetcoError> {
        let weekday = parse_weekday(&weekday)?;
        let db = self.db.lock()?;
        let ack =
            AvailabilityManager::new(&db).update_hours(&vet_id, weekday, &start, &end, enabled)?;
        Ok(ack.notice.into())
    }

    pub fn add_service_location(
        &self,
        vet_id: String,
        name: String,
        radius_km: Option<u32>,
    ) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        let ack = AvailabilityManager::new(&db).add_location(&vet_id, &name, radius_km)?;
        Ok(ack.notice.into())
    }

    pub fn remove_service_location(
        &self,
        vet_id: String,
        location_id: i64,
    ) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        Ok(AvailabilityManager::new(&db)
            .remove_location(&vet_id, location_id)?
            .into())
    }

    pub fn set_default_service_location(
        &self,
        vet_id: String,
        location_id: i64,
    ) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        Ok(AvailabilityManager::new(&db)
            .set_default_location(&vet_id, location_id)?
            .into())
    }

    pub fn add_service(
        &self,
        vet_id: String,
        name: String,
        duration_minutes: u32,
        price_ugx: u64,
    ) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        let ack =
            AvailabilityManager::new(&db).add_service(&vet_id, &name, duration_minutes, price_ugx)?;
        Ok(ack.notice.into())
    }

    pub fn remove_service(&self, vet_id: String, service_id: i64) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        Ok(AvailabilityManager::new(&db)
            .remove_service(&vet_id, service_id)?
            .into())
    }

    pub fn add_special_date(
        &self,
        vet_id: String,
        date: String,
        available: bool,
        reason: String,
    ) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        let ack =
            AvailabilityManager::new(&db).add_special_date(&vet_id, &date, available, &reason)?;
        Ok(ack.notice.into())
    }

    pub fn remove_special_date(&self, vet_id: String, date: String) -> Result<FfiNotice, VetcoError> {
        let date = validation::parse_date_input(&date)?;
        let db = self.db.lock()?;
        Ok(AvailabilityManager::new(&db)
            .remove_special_date(&vet_id, date)?
            .into())
    }

    pub fn update_booking_policy(
        &self,
        vet_id: String,
        policy: FfiBookingPolicy,
    ) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        let ack = AvailabilityManager::new(&db).update_policy(&vet_id, policy.into())?;
        Ok(ack.notice.into())
    }

    /// Check a slot against the vet's settings. Returns the reason it is
    /// refused, or `None` when it is free.
    pub fn check_slot(
        &self,
        vet_id: String,
        date: String,
        time: String,
    ) -> Result<Option<String>, VetcoError> {
        let date = validation::parse_date_input(&date)?;
        let time = validation::parse_time_input(&time)?;
        let db = self.db.lock()?;
        let verdict = AvailabilityManager::new(&db).check(
            &vet_id,
            date,
            time,
            Local::now().naive_local(),
            None,
        )?;
        Ok(verdict.err().map(|violation| violation.to_string()))
    }

    // =========================================================================
    // Vet directory
    // =========================================================================

    /// Search vets. `availability` is "all", "available" or "unavailable".
    pub fn search_vets(
        &self,
        farmer_id: String,
        term: String,
        specialty: Option<String>,
        availability: String,
    ) -> Result<Vec<FfiVetListing>, VetcoError> {
        let availability = models::AvailabilityFilter::parse(&availability).ok_or_else(|| {
            VetcoError::InvalidInput(format!("Unknown availability filter: {}", availability))
        })?;
        let search = models::VetSearch {
            term,
            specialty: specialty.filter(|s| !s.trim().is_empty() && s != "all"),
            availability,
        };
        let db = self.db.lock()?;
        let listings = VetDirectory::new(&db).search(&farmer_id, &search)?;
        Ok(listings.into_iter().map(Into::into).collect())
    }

    pub fn vet_specialties(&self) -> Result<Vec<String>, VetcoError> {
        let db = self.db.lock()?;
        Ok(VetDirectory::new(&db).specialties()?)
    }

    pub fn favorite_vets(&self, farmer_id: String) -> Result<Vec<FfiVetListing>, VetcoError> {
        let db = self.db.lock()?;
        let listings = VetDirectory::new(&db).favorites(&farmer_id)?;
        Ok(listings.into_iter().map(Into::into).collect())
    }

    pub fn toggle_favorite_vet(
        &self,
        farmer_id: String,
        vet_id: String,
    ) -> Result<FfiPreferenceResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(VetDirectory::new(&db)
            .toggle_favorite(&farmer_id, &vet_id)?
            .into())
    }

    pub fn toggle_saved_vet(
        &self,
        farmer_id: String,
        vet_id: String,
    ) -> Result<FfiPreferenceResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(VetDirectory::new(&db)
            .toggle_saved(&farmer_id, &vet_id)?
            .into())
    }

    pub fn set_vet_note(
        &self,
        farmer_id: String,
        vet_id: String,
        note: String,
    ) -> Result<FfiPreferenceResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(VetDirectory::new(&db)
            .set_note(&farmer_id, &vet_id, &note)?
            .into())
    }

    // =========================================================================
    // Knowledge hub
    // =========================================================================

    pub fn list_diseases(&self) -> Result<Vec<FfiDisease>, VetcoError> {
        let db = self.db.lock()?;
        Ok(KnowledgeHub::new(&db)
            .list()?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn search_diseases(&self, term: String) -> Result<Vec<FfiDisease>, VetcoError> {
        let db = self.db.lock()?;
        Ok(KnowledgeHub::new(&db)
            .search(&term)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn add_disease(&self, disease: FfiDisease) -> Result<FfiDiseaseResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(KnowledgeHub::new(&db).add(&disease.into())?.into())
    }

    pub fn update_disease(&self, disease: FfiDisease) -> Result<FfiDiseaseResult, VetcoError> {
        let db = self.db.lock()?;
        Ok(KnowledgeHub::new(&db).update(&disease.into())?.into())
    }

    pub fn delete_disease(&self, disease_id: i64) -> Result<FfiNotice, VetcoError> {
        let db = self.db.lock()?;
        Ok(KnowledgeHub::new(&db).delete(disease_id)?.into())
    }
}
