//! Farmer-side and vet-side projections of the appointment store.

use serde::{Deserialize, Serialize};

use crate::models::{calendar, Appointment, Role, StatusCounts};

/// The vet's four tabs, each in bucket order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VetAppointmentView {
    pub pending: Vec<Appointment>,
    pub confirmed: Vec<Appointment>,
    pub completed: Vec<Appointment>,
    pub cancelled: Vec<Appointment>,
}

impl VetAppointmentView {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            pending: self.pending.len() as u32,
            confirmed: self.confirmed.len() as u32,
            completed: self.completed.len() as u32,
            cancelled: self.cancelled.len() as u32,
        }
    }

    /// Appointments in any tab whose farmer, animal or issue matches `term`.
    pub fn search(&self, term: &str) -> Vec<&Appointment> {
        let term = term.trim().to_lowercase();
        [&self.pending, &self.confirmed, &self.completed, &self.cancelled]
            .into_iter()
            .flatten()
            .filter(|a| {
                term.is_empty()
                    || a.farmer.name.to_lowercase().contains(&term)
                    || a.animal_type.to_lowercase().contains(&term)
                    || a.issue.to_lowercase().contains(&term)
            })
            .collect()
    }
}

/// The farmer's two tabs: open appointments and finished ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FarmerAppointmentView {
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}

/// Wall-clock time as the given side displays it: 12-hour for farmers,
/// 24-hour for vets.
pub fn display_time(appointment: &Appointment, viewer: Role) -> String {
    match viewer {
        Role::Farmer => calendar::format_time_12h(appointment.time),
        Role::Vet => calendar::format_time_24h(appointment.time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, FarmerSummary, VetSummary};

    fn appointment(time: &str, issue: &str) -> Appointment {
        Appointment {
            id: 1,
            farmer: FarmerSummary {
                id: "farmer-001".into(),
                name: "John Doe".into(),
                location: "Kampala".into(),
                phone: String::new(),
                avatar: None,
            },
            vet: VetSummary {
                id: "vet-001".into(),
                name: "Dr. Mukasa".into(),
                specialty: String::new(),
                avatar: None,
            },
            date: calendar::parse_date("2023-12-15").unwrap(),
            time: calendar::parse_time(time).unwrap(),
            location: String::new(),
            animal_type: "Dairy Cow".into(),
            animal_id: None,
            issue: issue.into(),
            notes: String::new(),
            status: AppointmentStatus::Pending,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_display_time_per_side() {
        let a = appointment("14:00", "Checkup");
        assert_eq!(display_time(&a, Role::Farmer), "2:00 PM");
        assert_eq!(display_time(&a, Role::Vet), "14:00");
    }

    #[test]
    fn test_vet_view_search() {
        let view = VetAppointmentView {
            pending: vec![appointment("09:00", "Vaccination")],
            confirmed: vec![appointment("10:00", "Limping")],
            ..Default::default()
        };
        assert_eq!(view.counts().total(), 2);
        assert_eq!(view.search("limp").len(), 1);
        assert_eq!(view.search("john").len(), 2);
        assert_eq!(view.search("").len(), 2);
    }
}
