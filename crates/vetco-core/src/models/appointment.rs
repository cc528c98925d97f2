//! Appointment models and the status state machine.
//!
//! ```text
//!   pending ──accept──▶ confirmed ──complete──▶ completed
//!      │                    │
//!      └──────cancel────────┴──────────────────▶ cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. Reschedule and note edits never
//! change the status.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::party::{FarmerSummary, VetSummary};

/// Appointment status. Terminal states carry the data they require, so a
/// completed appointment without a diagnosis cannot be constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Requested by the farmer, awaiting the vet
    Pending,
    /// Accepted by the vet
    Confirmed,
    /// Visit done
    Completed { diagnosis: String, treatment: String },
    /// Declined or cancelled by either party
    Cancelled { reason: String },
}

impl AppointmentStatus {
    pub fn bucket(&self) -> StatusBucket {
        match self {
            AppointmentStatus::Pending => StatusBucket::Pending,
            AppointmentStatus::Confirmed => StatusBucket::Confirmed,
            AppointmentStatus::Completed { .. } => StatusBucket::Completed,
            AppointmentStatus::Cancelled { .. } => StatusBucket::Cancelled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.bucket().is_terminal()
    }

    /// Whether `action` may be applied from this status.
    pub fn allows(&self, action: Action) -> bool {
        use StatusBucket::*;
        match (self.bucket(), action) {
            (Pending, Action::Accept) => true,
            (Pending | Confirmed, Action::Cancel) => true,
            (Confirmed, Action::Complete) => true,
            (Pending | Confirmed, Action::Reschedule) => true,
            (_, Action::EditNotes) => true,
            _ => false,
        }
    }
}

/// Status-partitioned collection an appointment lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl StatusBucket {
    pub const ALL: [StatusBucket; 4] = [
        StatusBucket::Pending,
        StatusBucket::Confirmed,
        StatusBucket::Completed,
        StatusBucket::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusBucket::Pending => "pending",
            StatusBucket::Confirmed => "confirmed",
            StatusBucket::Completed => "completed",
            StatusBucket::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<StatusBucket> {
        match s {
            "pending" => Some(StatusBucket::Pending),
            "confirmed" => Some(StatusBucket::Confirmed),
            "completed" => Some(StatusBucket::Completed),
            "cancelled" => Some(StatusBucket::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StatusBucket::Completed | StatusBucket::Cancelled)
    }

    /// The coarser farmer-side projection of this bucket.
    pub fn farmer_bucket(self) -> FarmerBucket {
        if self.is_terminal() {
            FarmerBucket::Past
        } else {
            FarmerBucket::Upcoming
        }
    }
}

/// Farmer-facing tabs: everything still open is upcoming.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FarmerBucket {
    Upcoming,
    Past,
}

impl FarmerBucket {
    pub fn buckets(self) -> &'static [StatusBucket] {
        match self {
            FarmerBucket::Upcoming => &[StatusBucket::Pending, StatusBucket::Confirmed],
            FarmerBucket::Past => &[StatusBucket::Completed, StatusBucket::Cancelled],
        }
    }
}

/// Operations that act on an existing appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Accept,
    Cancel,
    Complete,
    Reschedule,
    EditNotes,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Accept => "accept",
            Action::Cancel => "cancel",
            Action::Complete => "complete",
            Action::Reschedule => "reschedule",
            Action::EditNotes => "edit notes",
        }
    }
}

/// A scheduled visit between one farmer and one vet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub farmer: FarmerSummary,
    pub vet: VetSummary,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Free-text visit location (e.g. "Farmer's Location")
    pub location: String,
    /// Animal or herd description (e.g. "Goats (5)")
    pub animal_type: String,
    /// Registry id of the animal, when booked for a single animal
    pub animal_id: Option<String>,
    /// Reason for the visit
    pub issue: String,
    /// Free-text notes, editable in any state
    pub notes: String,
    #[serde(flatten)]
    pub status: AppointmentStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Appointment {
    pub fn bucket(&self) -> StatusBucket {
        self.status.bucket()
    }

    pub fn diagnosis(&self) -> Option<&str> {
        match &self.status {
            AppointmentStatus::Completed { diagnosis, .. } => Some(diagnosis),
            _ => None,
        }
    }

    pub fn treatment(&self) -> Option<&str> {
        match &self.status {
            AppointmentStatus::Completed { treatment, .. } => Some(treatment),
            _ => None,
        }
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        match &self.status {
            AppointmentStatus::Cancelled { reason } => Some(reason),
            _ => None,
        }
    }
}

/// A farmer's booking request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookingRequest {
    pub farmer_id: String,
    pub vet_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// "14:00" or "2:00 PM"
    pub time: String,
    pub location: String,
    pub animal_type: String,
    pub animal_id: Option<String>,
    pub issue: String,
    pub notes: String,
}

/// Per-bucket totals for a vet's dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub pending: u32,
    pub confirmed: u32,
    pub completed: u32,
    pub cancelled: u32,
}

impl StatusCounts {
    pub fn get(&self, bucket: StatusBucket) -> u32 {
        match bucket {
            StatusBucket::Pending => self.pending,
            StatusBucket::Confirmed => self.confirmed,
            StatusBucket::Completed => self.completed,
            StatusBucket::Cancelled => self.cancelled,
        }
    }

    pub fn total(&self) -> u32 {
        self.pending + self.confirmed + self.completed + self.cancelled
    }
}
