//! User-input guards shared by every service.
//!
//! Each failure maps to a destructive [`Notice`] carrying the text the views
//! show. A guard runs before any mutation, so a failed operation leaves the
//! store untouched.

use thiserror::Error;

use crate::models::{Notice, PolicyViolation};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("a cancellation reason is required")]
    ReasonRequired,

    #[error("both diagnosis and treatment are required")]
    CompletionInfoRequired,

    #[error("both a new date and a new time are required")]
    RescheduleDateTimeRequired,

    #[error("both a date and a time are required")]
    BookingDateTimeRequired,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("required fields are missing: {0}")]
    MissingFields(String),

    #[error("an animal with id {0} already exists")]
    DuplicateAnimalId(String),

    #[error("animal {0} has health records")]
    AnimalHasRecords(String),

    #[error("unknown animal: {0}")]
    UnknownAnimal(String),

    #[error("unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("unknown gender: {0}")]
    UnknownGender(String),

    #[error("the vet is not accepting bookings")]
    NotAcceptingBookings,

    #[error("requested slot is unavailable: {0}")]
    SlotUnavailable(PolicyViolation),

    #[error("working hours must start before they end")]
    InvalidHours,

    #[error("a location name is required")]
    LocationNameRequired,

    #[error("at least one service location is required")]
    LastLocation,

    #[error("a service name is required")]
    ServiceNameRequired,

    #[error("service duration must be positive")]
    InvalidDuration,

    #[error("service price must be positive")]
    InvalidPrice,

    #[error("a date is required")]
    SpecialDateRequired,

    #[error("a reason is required for a special date")]
    SpecialDateReasonRequired,

    #[error("special date {0} already exists")]
    DuplicateSpecialDate(String),

    #[error("maximum appointments per day must be at least 1")]
    InvalidDailyLimit,

    #[error("a disease name is required")]
    DiseaseNameRequired,
}

impl ValidationError {
    /// The destructive notice shown when this guard refuses an operation.
    pub fn notice(&self) -> Notice {
        use ValidationError::*;
        match self {
            ReasonRequired => {
                Notice::destructive("Reason Required", "Please provide a reason for cancellation.")
            }
            CompletionInfoRequired => Notice::destructive(
                "Information Required",
                "Please provide both diagnosis and treatment information.",
            ),
            RescheduleDateTimeRequired => Notice::destructive(
                "Information Required",
                "Please select both a date and time for rescheduling.",
            ),
            BookingDateTimeRequired => Notice::destructive(
                "Missing information",
                "Please select both a date and time for your appointment.",
            ),
            InvalidDate(value) => {
                Notice::destructive("Invalid date", format!("\"{value}\" is not a valid date."))
            }
            InvalidTime(value) => {
                Notice::destructive("Invalid time", format!("\"{value}\" is not a valid time."))
            }
            MissingFields(_) => {
                Notice::destructive("Missing information", "Please fill in all required fields.")
            }
            DuplicateAnimalId(_) => {
                Notice::destructive("Duplicate ID", "An animal with this ID already exists.")
            }
            AnimalHasRecords(_) => Notice::destructive(
                "Cannot delete",
                "This animal has health records. Delete the records first.",
            ),
            UnknownAnimal(id) => {
                Notice::destructive("Unknown animal", format!("No animal with ID {id} exists."))
            }
            UnknownRecordType(value) => Notice::destructive(
                "Invalid record type",
                format!("\"{value}\" is not a recognised record type."),
            ),
            UnknownGender(value) => Notice::destructive(
                "Invalid gender",
                format!("\"{value}\" must be Male or Female."),
            ),
            NotAcceptingBookings => Notice::destructive(
                "Unavailable",
                "This vet is not accepting bookings at the moment.",
            ),
            SlotUnavailable(violation) => {
                Notice::destructive("Time unavailable", format!("Cannot book: {violation}."))
            }
            InvalidHours => Notice::destructive(
                "Invalid hours",
                "The start time must be before the end time.",
            ),
            LocationNameRequired => {
                Notice::destructive("Location name required", "Please enter a name for the location.")
            }
            LastLocation => Notice::destructive(
                "Cannot remove location",
                "You must have at least one service location.",
            ),
            ServiceNameRequired => {
                Notice::destructive("Service name required", "Please enter a name for the service.")
            }
            InvalidDuration => Notice::destructive(
                "Invalid duration",
                "Please enter a valid duration for the service.",
            ),
            InvalidPrice => {
                Notice::destructive("Invalid price", "Please enter a valid price for the service.")
            }
            SpecialDateRequired => Notice::destructive("Date required", "Please select a date."),
            SpecialDateReasonRequired => Notice::destructive(
                "Reason required",
                "Please provide a reason for this special date.",
            ),
            DuplicateSpecialDate(_) => Notice::destructive(
                "Date already exists",
                "This date is already in your special dates list.",
            ),
            InvalidDailyLimit => Notice::destructive(
                "Invalid limit",
                "Maximum appointments per day must be at least 1.",
            ),
            DiseaseNameRequired => Notice::destructive("Error", "Disease name cannot be empty"),
        }
    }
}

/// Whether a text input is empty once trimmed.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Names of the blank entries among `(name, value)` pairs, or `Ok` if none.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing.join(", ")))
    }
}

/// Parse a required `YYYY-MM-DD` input.
pub fn parse_date_input(value: &str) -> Result<chrono::NaiveDate, ValidationError> {
    crate::models::calendar::parse_date(value)
        .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

/// Parse a required time input in 24- or 12-hour form.
pub fn parse_time_input(value: &str) -> Result<chrono::NaiveTime, ValidationError> {
    crate::models::calendar::parse_time(value)
        .ok_or_else(|| ValidationError::InvalidTime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoticeVariant;

    #[test]
    fn test_notices_are_destructive() {
        let notice = ValidationError::ReasonRequired.notice();
        assert_eq!(notice.title, "Reason Required");
        assert_eq!(notice.description, "Please provide a reason for cancellation.");
        assert_eq!(notice.variant, NoticeVariant::Destructive);

        let notice = ValidationError::CompletionInfoRequired.notice();
        assert_eq!(notice.title, "Information Required");
    }

    #[test]
    fn test_require_fields_lists_blank_names() {
        assert!(require_fields(&[("name", "Bella"), ("type", "Cow")]).is_ok());
        assert_eq!(
            require_fields(&[("id", " "), ("name", "Bella"), ("type", "")]),
            Err(ValidationError::MissingFields("id, type".into()))
        );
    }

    #[test]
    fn test_input_parsing() {
        assert!(parse_date_input("2023-12-15").is_ok());
        assert_eq!(
            parse_date_input("15/12/2023"),
            Err(ValidationError::InvalidDate("15/12/2023".into()))
        );
        assert!(parse_time_input("2:00 PM").is_ok());
        assert!(parse_time_input("noon").is_err());
    }
}
