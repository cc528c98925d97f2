//! FFI-safe records. Dates and times cross the boundary as strings.

use chrono::{Local, NaiveDate};

use crate::availability::DEFAULT_RADIUS_KM;
use crate::messaging::{ConversationThread, SentMessage};
use crate::models::{
    calendar, format_price_ugx, Acknowledged, Animal, AnimalInput, Appointment,
    AvailabilitySettings, BookingPolicy, BookingRequest, Conversation, Disease, Farmer,
    HealthRecord, Message, Notice, NoticeVariant, RecordInput, Role, ServiceLocation,
    ServiceOffering, SpecialDate, StatusCounts, Vet, VetListing, VetPreference, WorkingHours,
};
use crate::records::{age_in_years, record_date_label};
use crate::scheduling::{display_time, FarmerAppointmentView, VetAppointmentView};

/// FFI-safe notice (toast).
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiNotice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl From<Notice> for FfiNotice {
    fn from(notice: Notice) -> Self {
        Self {
            title: notice.title,
            description: notice.description,
            destructive: notice.variant == NoticeVariant::Destructive,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFarmer {
    pub id: String,
    pub name: String,
    pub location: String,
    pub phone: String,
    pub avatar: Option<String>,
}

impl From<Farmer> for FfiFarmer {
    fn from(farmer: Farmer) -> Self {
        Self {
            id: farmer.id,
            name: farmer.name,
            location: farmer.location,
            phone: farmer.phone,
            avatar: farmer.avatar,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVet {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: String,
    pub rating: f64,
    pub reviews: u32,
    pub bio: String,
    pub avatar: Option<String>,
    pub accepting_bookings: bool,
    pub available_times: Vec<String>,
}

impl From<Vet> for FfiVet {
    fn from(vet: Vet) -> Self {
        Self {
            id: vet.id,
            name: vet.name,
            specialty: vet.specialty,
            location: vet.location,
            rating: vet.rating,
            reviews: vet.reviews,
            bio: vet.bio,
            avatar: vet.avatar,
            accepting_bookings: vet.accepting_bookings,
            available_times: vet.available_times,
        }
    }
}

// =========================================================================
// Appointments
// =========================================================================

/// FFI-safe appointment. `time` is canonical 24-hour; `display_time` is
/// formatted for the side that asked.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: i64,
    pub farmer_id: String,
    pub farmer_name: String,
    pub farmer_location: String,
    pub farmer_phone: String,
    pub farmer_avatar: Option<String>,
    pub vet_id: String,
    pub vet_name: String,
    pub vet_specialty: String,
    pub vet_avatar: Option<String>,
    pub date: String,
    pub time: String,
    pub display_time: String,
    pub location: String,
    pub animal_type: String,
    pub animal_id: Option<String>,
    pub issue: String,
    pub notes: String,
    pub status: String,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub cancellation_reason: Option<String>,
}

impl FfiAppointment {
    pub fn for_viewer(appointment: Appointment, viewer: Role) -> Self {
        let display_time = display_time(&appointment, viewer);
        Self {
            id: appointment.id,
            date: calendar::format_date(appointment.date),
            time: calendar::format_time_24h(appointment.time),
            display_time,
            status: appointment.bucket().as_str().to_string(),
            diagnosis: appointment.diagnosis().map(String::from),
            treatment: appointment.treatment().map(String::from),
            cancellation_reason: appointment.cancellation_reason().map(String::from),
            farmer_id: appointment.farmer.id,
            farmer_name: appointment.farmer.name,
            farmer_location: appointment.farmer.location,
            farmer_phone: appointment.farmer.phone,
            farmer_avatar: appointment.farmer.avatar,
            vet_id: appointment.vet.id,
            vet_name: appointment.vet.name,
            vet_specialty: appointment.vet.specialty,
            vet_avatar: appointment.vet.avatar,
            location: appointment.location,
            animal_type: appointment.animal_type,
            animal_id: appointment.animal_id,
            issue: appointment.issue,
            notes: appointment.notes,
        }
    }

    pub fn list(appointments: Vec<Appointment>, viewer: Role) -> Vec<Self> {
        appointments
            .into_iter()
            .map(|a| Self::for_viewer(a, viewer))
            .collect()
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointmentResult {
    pub appointment: FfiAppointment,
    pub notice: FfiNotice,
}

impl FfiAppointmentResult {
    pub fn new(ack: Acknowledged<Appointment>, viewer: Role) -> Self {
        Self {
            appointment: FfiAppointment::for_viewer(ack.value, viewer),
            notice: ack.notice.into(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBookingRequest {
    pub farmer_id: String,
    pub vet_id: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub animal_type: String,
    pub animal_id: Option<String>,
    pub issue: String,
    pub notes: String,
}

impl From<FfiBookingRequest> for BookingRequest {
    fn from(request: FfiBookingRequest) -> Self {
        BookingRequest {
            farmer_id: request.farmer_id,
            vet_id: request.vet_id,
            date: request.date,
            time: request.time,
            location: request.location,
            animal_type: request.animal_type,
            animal_id: request.animal_id,
            issue: request.issue,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVetAppointments {
    pub pending: Vec<FfiAppointment>,
    pub confirmed: Vec<FfiAppointment>,
    pub completed: Vec<FfiAppointment>,
    pub cancelled: Vec<FfiAppointment>,
}

impl From<VetAppointmentView> for FfiVetAppointments {
    fn from(view: VetAppointmentView) -> Self {
        Self {
            pending: FfiAppointment::list(view.pending, Role::Vet),
            confirmed: FfiAppointment::list(view.confirmed, Role::Vet),
            completed: FfiAppointment::list(view.completed, Role::Vet),
            cancelled: FfiAppointment::list(view.cancelled, Role::Vet),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFarmerAppointments {
    pub upcoming: Vec<FfiAppointment>,
    pub past: Vec<FfiAppointment>,
}

impl From<FarmerAppointmentView> for FfiFarmerAppointments {
    fn from(view: FarmerAppointmentView) -> Self {
        Self {
            upcoming: FfiAppointment::list(view.upcoming, Role::Farmer),
            past: FfiAppointment::list(view.past, Role::Farmer),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatusCounts {
    pub pending: u32,
    pub confirmed: u32,
    pub completed: u32,
    pub cancelled: u32,
}

impl From<StatusCounts> for FfiStatusCounts {
    fn from(counts: StatusCounts) -> Self {
        Self {
            pending: counts.pending,
            confirmed: counts.confirmed,
            completed: counts.completed,
            cancelled: counts.cancelled,
        }
    }
}

// =========================================================================
// Registry
// =========================================================================

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnimal {
    pub id: String,
    pub farmer_id: String,
    pub name: String,
    pub animal_type: String,
    pub breed: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    /// Whole years on the day the record was built
    pub age_years: Option<u32>,
}

impl FfiAnimal {
    pub fn as_of(animal: Animal, today: NaiveDate) -> Self {
        let age_years = age_in_years(&animal, today);
        Self {
            age_years,
            id: animal.id,
            farmer_id: animal.farmer_id,
            name: animal.name,
            animal_type: animal.animal_type,
            breed: animal.breed,
            birth_date: animal.birth_date.map(calendar::format_date),
            gender: animal.gender.map(|g| g.as_str().to_string()),
        }
    }
}

impl From<Animal> for FfiAnimal {
    fn from(animal: Animal) -> Self {
        Self::as_of(animal, Local::now().date_naive())
    }
}

/// Animal form input. Empty strings mean "not given".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnimalInput {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub breed: String,
    pub birth_date: String,
    pub gender: String,
}

impl From<FfiAnimalInput> for AnimalInput {
    fn from(input: FfiAnimalInput) -> Self {
        AnimalInput {
            id: input.id,
            name: input.name,
            animal_type: input.animal_type,
            breed: input.breed,
            birth_date: input.birth_date,
            gender: input.gender,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnimalResult {
    pub animal: FfiAnimal,
    pub notice: FfiNotice,
}

impl From<Acknowledged<Animal>> for FfiAnimalResult {
    fn from(ack: Acknowledged<Animal>) -> Self {
        Self {
            animal: ack.value.into(),
            notice: ack.notice.into(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthRecord {
    pub id: i64,
    pub animal_id: String,
    pub animal_name: String,
    pub animal_type: String,
    pub record_type: String,
    pub date: String,
    /// e.g. "Friday, Dec 15"
    pub date_label: String,
    pub description: String,
    pub vet: String,
    pub notes: String,
}

impl From<HealthRecord> for FfiHealthRecord {
    fn from(record: HealthRecord) -> Self {
        let date_label = record_date_label(&record);
        Self {
            date_label,
            id: record.id,
            animal_id: record.animal_id,
            animal_name: record.animal_name,
            animal_type: record.animal_type,
            record_type: record.record_type.as_str().to_string(),
            date: calendar::format_date(record.date),
            description: record.description,
            vet: record.vet,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordInput {
    pub animal_id: String,
    pub record_type: String,
    pub date: String,
    pub description: String,
    pub vet: String,
    pub notes: String,
}

impl From<FfiRecordInput> for RecordInput {
    fn from(input: FfiRecordInput) -> Self {
        RecordInput {
            animal_id: input.animal_id,
            record_type: input.record_type,
            date: input.date,
            description: input.description,
            vet: input.vet,
            notes: input.notes,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordResult {
    pub record: FfiHealthRecord,
    pub notice: FfiNotice,
}

impl From<Acknowledged<HealthRecord>> for FfiRecordResult {
    fn from(ack: Acknowledged<HealthRecord>) -> Self {
        Self {
            record: ack.value.into(),
            notice: ack.notice.into(),
        }
    }
}

// =========================================================================
// Messaging
// =========================================================================

/// A conversation as one side sees it.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConversation {
    pub id: i64,
    pub farmer_id: String,
    pub vet_id: String,
    pub counterpart_name: String,
    pub counterpart_avatar: Option<String>,
    pub last_message: String,
    pub last_message_at: Option<String>,
    pub unread: bool,
}

impl FfiConversation {
    pub fn for_viewer(conversation: Conversation, viewer: Role) -> Self {
        let counterpart_name = conversation.counterpart_name(viewer).to_string();
        let unread = conversation.is_unread_for(viewer);
        let counterpart_avatar = match viewer {
            Role::Farmer => conversation.vet.avatar,
            Role::Vet => conversation.farmer.avatar,
        };
        Self {
            id: conversation.id,
            farmer_id: conversation.farmer.id,
            vet_id: conversation.vet.id,
            counterpart_name,
            counterpart_avatar,
            last_message: conversation.last_message,
            last_message_at: conversation.last_message_at,
            unread,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMessage {
    pub id: i64,
    pub conversation_id: i64,
    /// "farmer" or "vet"
    pub sender: String,
    pub text: String,
    pub sent_at: String,
}

impl From<Message> for FfiMessage {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender: message.sender.as_str().to_string(),
            text: message.text,
            sent_at: message.sent_at,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiThread {
    pub conversation: FfiConversation,
    pub messages: Vec<FfiMessage>,
}

impl FfiThread {
    pub fn for_viewer(thread: ConversationThread, viewer: Role) -> Self {
        Self {
            conversation: FfiConversation::for_viewer(thread.conversation, viewer),
            messages: thread.messages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSentMessage {
    pub message: FfiMessage,
    /// Unix milliseconds at which the counterpart reply becomes due
    pub reply_due_at_ms: Option<i64>,
}

impl From<SentMessage> for FfiSentMessage {
    fn from(sent: SentMessage) -> Self {
        Self {
            message: sent.message.into(),
            reply_due_at_ms: sent.reply_due_at_ms,
        }
    }
}

// =========================================================================
// Availability
// =========================================================================

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWorkingHours {
    /// "Mon" .. "Sun"
    pub weekday: String,
    pub start: String,
    pub end: String,
    pub enabled: bool,
}

impl From<WorkingHours> for FfiWorkingHours {
    fn from(hours: WorkingHours) -> Self {
        Self {
            weekday: hours.weekday.to_string(),
            start: calendar::format_time_24h(hours.start),
            end: calendar::format_time_24h(hours.end),
            enabled: hours.enabled,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiServiceLocation {
    pub id: i64,
    pub name: String,
    pub radius_km: u32,
    pub is_default: bool,
}

impl From<ServiceLocation> for FfiServiceLocation {
    fn from(location: ServiceLocation) -> Self {
        Self {
            id: location.id,
            name: location.name,
            radius_km: location.radius_km,
            is_default: location.is_default,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiServiceOffering {
    pub id: i64,
    pub name: String,
    pub duration_minutes: u32,
    pub price_ugx: u64,
    /// e.g. "UGX 50,000"
    pub price_label: String,
}

impl From<ServiceOffering> for FfiServiceOffering {
    fn from(service: ServiceOffering) -> Self {
        Self {
            price_label: format_price_ugx(service.price_ugx),
            id: service.id,
            name: service.name,
            duration_minutes: service.duration_minutes,
            price_ugx: service.price_ugx,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSpecialDate {
    pub date: String,
    pub available: bool,
    pub reason: String,
}

impl From<SpecialDate> for FfiSpecialDate {
    fn from(special: SpecialDate) -> Self {
        Self {
            date: calendar::format_date(special.date),
            available: special.available,
            reason: special.reason,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBookingPolicy {
    pub buffer_minutes: u32,
    pub max_per_day: u32,
    pub notice_hours: u32,
}

impl From<BookingPolicy> for FfiBookingPolicy {
    fn from(policy: BookingPolicy) -> Self {
        Self {
            buffer_minutes: policy.buffer_minutes,
            max_per_day: policy.max_per_day,
            notice_hours: policy.notice_hours,
        }
    }
}

impl From<FfiBookingPolicy> for BookingPolicy {
    fn from(policy: FfiBookingPolicy) -> Self {
        BookingPolicy {
            buffer_minutes: policy.buffer_minutes,
            max_per_day: policy.max_per_day,
            notice_hours: policy.notice_hours,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAvailability {
    pub vet_id: String,
    pub accepting_bookings: bool,
    pub working_hours: Vec<FfiWorkingHours>,
    pub locations: Vec<FfiServiceLocation>,
    pub services: Vec<FfiServiceOffering>,
    pub special_dates: Vec<FfiSpecialDate>,
    pub policy: FfiBookingPolicy,
    pub default_radius_km: u32,
}

impl From<AvailabilitySettings> for FfiAvailability {
    fn from(settings: AvailabilitySettings) -> Self {
        Self {
            vet_id: settings.vet_id,
            accepting_bookings: settings.accepting_bookings,
            working_hours: settings.working_hours.into_iter().map(Into::into).collect(),
            locations: settings.locations.into_iter().map(Into::into).collect(),
            services: settings.services.into_iter().map(Into::into).collect(),
            special_dates: settings.special_dates.into_iter().map(Into::into).collect(),
            policy: settings.policy.into(),
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

// =========================================================================
// Directory and knowledge hub
// =========================================================================

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVetPreference {
    pub favorite: bool,
    pub saved: bool,
    pub note: String,
}

impl From<VetPreference> for FfiVetPreference {
    fn from(preference: VetPreference) -> Self {
        Self {
            favorite: preference.favorite,
            saved: preference.saved,
            note: preference.note,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVetListing {
    pub vet: FfiVet,
    pub preference: FfiVetPreference,
}

impl From<VetListing> for FfiVetListing {
    fn from(listing: VetListing) -> Self {
        Self {
            vet: listing.vet.into(),
            preference: listing.preference.into(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPreferenceResult {
    pub preference: FfiVetPreference,
    pub notice: FfiNotice,
}

impl From<Acknowledged<VetPreference>> for FfiPreferenceResult {
    fn from(ack: Acknowledged<VetPreference>) -> Self {
        Self {
            preference: ack.value.into(),
            notice: ack.notice.into(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDisease {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub symptoms: String,
    pub treatment: String,
    pub prevention: String,
}

impl From<Disease> for FfiDisease {
    fn from(disease: Disease) -> Self {
        Self {
            id: disease.id,
            name: disease.name,
            description: disease.description,
            symptoms: disease.symptoms,
            treatment: disease.treatment,
            prevention: disease.prevention,
        }
    }
}

impl From<FfiDisease> for Disease {
    fn from(disease: FfiDisease) -> Self {
        Disease {
            id: disease.id,
            name: disease.name,
            description: disease.description,
            symptoms: disease.symptoms,
            treatment: disease.treatment,
            prevention: disease.prevention,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDiseaseResult {
    pub disease: FfiDisease,
    pub notice: FfiNotice,
}

impl From<Acknowledged<Disease>> for FfiDiseaseResult {
    fn from(ack: Acknowledged<Disease>) -> Self {
        Self {
            disease: ack.value.into(),
            notice: ack.notice.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, RecordType};

    fn date(s: &str) -> NaiveDate {
        calendar::parse_date(s).unwrap()
    }

    #[test]
    fn test_animal_age_before_and_after_birthday() {
        let animal = Animal {
            id: "COW-001".into(),
            farmer_id: "farmer-001".into(),
            name: "Bessie".into(),
            animal_type: "Dairy Cow".into(),
            breed: Some("Friesian".into()),
            birth_date: Some(date("2020-03-15")),
            gender: Some(Gender::Female),
        };

        assert_eq!(FfiAnimal::as_of(animal.clone(), date("2023-03-14")).age_years, Some(2));
        let ffi = FfiAnimal::as_of(animal, date("2023-03-15"));
        assert_eq!(ffi.age_years, Some(3));
        assert_eq!(ffi.birth_date.as_deref(), Some("2020-03-15"));
    }

    #[test]
    fn test_record_carries_date_label() {
        let record = HealthRecord {
            id: 1,
            animal_id: "COW-001".into(),
            animal_name: "Bessie".into(),
            animal_type: "Dairy Cow".into(),
            record_type: RecordType::Vaccination,
            date: date("2023-12-15"),
            description: "East Coast Fever vaccination".into(),
            vet: "Dr. Joseph Mukasa".into(),
            notes: String::new(),
        };

        let ffi = FfiHealthRecord::from(record);
        assert_eq!(ffi.date, "2023-12-15");
        assert_eq!(ffi.date_label, "Friday, Dec 15");
    }
}
