//! Vet availability settings.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Working hours for one day of the week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingHours {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub enabled: bool,
}

impl WorkingHours {
    /// Whether a visit starting at `time` falls inside these hours.
    pub fn covers(&self, time: NaiveTime) -> bool {
        self.enabled && time >= self.start && time < self.end
    }

    /// Default week: Mon-Fri 09:00-17:00, Sat 10:00-14:00, Sunday off.
    pub fn default_week() -> Vec<WorkingHours> {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(|weekday| match weekday {
            Weekday::Sat => WorkingHours {
                weekday,
                start: hm(10, 0),
                end: hm(14, 0),
                enabled: true,
            },
            Weekday::Sun => WorkingHours {
                weekday,
                start: hm(0, 0),
                end: hm(0, 0),
                enabled: false,
            },
            _ => WorkingHours {
                weekday,
                start: hm(9, 0),
                end: hm(17, 0),
                enabled: true,
            },
        })
        .collect()
    }
}

/// A named area the vet travels to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceLocation {
    pub id: i64,
    pub name: String,
    pub radius_km: u32,
    pub is_default: bool,
}

/// A priced service the vet offers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOffering {
    pub id: i64,
    pub name: String,
    pub duration_minutes: u32,
    /// Price in Ugandan shillings
    pub price_ugx: u64,
}

/// A calendar override, keyed by exact date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialDate {
    pub date: NaiveDate,
    pub available: bool,
    pub reason: String,
}

/// Scalar booking policies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Minimum gap between appointment start times
    pub buffer_minutes: u32,
    /// Open (pending + confirmed) appointments allowed per day, at least 1
    pub max_per_day: u32,
    /// Minimum lead time for a booking
    pub notice_hours: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            buffer_minutes: 30,
            max_per_day: 8,
            notice_hours: 2,
        }
    }
}

/// The complete settings object shown on a vet's availability page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySettings {
    pub vet_id: String,
    pub accepting_bookings: bool,
    pub working_hours: Vec<WorkingHours>,
    pub locations: Vec<ServiceLocation>,
    pub services: Vec<ServiceOffering>,
    pub special_dates: Vec<SpecialDate>,
    pub policy: BookingPolicy,
}

impl AvailabilitySettings {
    pub fn hours_for(&self, weekday: Weekday) -> Option<&WorkingHours> {
        self.working_hours.iter().find(|h| h.weekday == weekday)
    }

    pub fn special_date(&self, date: NaiveDate) -> Option<&SpecialDate> {
        self.special_dates.iter().find(|d| d.date == date)
    }

    pub fn default_location(&self) -> Option<&ServiceLocation> {
        self.locations.iter().find(|l| l.is_default)
    }
}

/// Reasons a requested slot breaks the vet's availability rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PolicyViolation {
    /// The vet has switched bookings off
    NotAcceptingBookings,
    /// Marked unavailable on this date
    SpecialDateClosed { reason: String },
    /// No working hours on this weekday
    ClosedDay { weekday: Weekday },
    /// Outside the day's working hours
    OutsideHours { start: NaiveTime, end: NaiveTime },
    /// Less lead time than the vet requires
    InsufficientNotice { notice_hours: u32 },
    /// The day already has the maximum number of open appointments
    DailyLimitReached { max_per_day: u32 },
    /// Too close to another open appointment
    BufferConflict { appointment_id: i64, buffer_minutes: u32 },
}

impl std::fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyViolation::NotAcceptingBookings => {
                write!(f, "the vet is not accepting bookings")
            }
            PolicyViolation::SpecialDateClosed { reason } => {
                write!(f, "the vet is unavailable on this date ({reason})")
            }
            PolicyViolation::ClosedDay { weekday } => {
                write!(f, "the vet does not work on {weekday}")
            }
            PolicyViolation::OutsideHours { start, end } => write!(
                f,
                "outside working hours ({}-{})",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            PolicyViolation::InsufficientNotice { notice_hours } => {
                write!(f, "bookings need at least {notice_hours} hours notice")
            }
            PolicyViolation::DailyLimitReached { max_per_day } => {
                write!(f, "the vet already has {max_per_day} appointments that day")
            }
            PolicyViolation::BufferConflict {
                appointment_id,
                buffer_minutes,
            } => write!(
                f,
                "within {buffer_minutes} minutes of appointment {appointment_id}"
            ),
        }
    }
}

/// Format a shilling amount the way the availability page shows prices,
/// e.g. `UGX 50,000`.
pub fn format_price_ugx(price: u64) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("UGX {grouped}")
}
