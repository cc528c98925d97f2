//! Knowledge hub and vet directory models.

use serde::{Deserialize, Serialize};

use super::party::Vet;

/// A livestock disease reference entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Disease {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub symptoms: String,
    pub treatment: String,
    pub prevention: String,
}

/// A farmer's private markers on a vet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VetPreference {
    pub favorite: bool,
    pub saved: bool,
    pub note: String,
}

/// A directory entry: the vet plus the viewing farmer's preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VetListing {
    pub vet: Vet,
    pub preference: VetPreference,
}

/// Availability filter for the directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AvailabilityFilter {
    #[default]
    All,
    Available,
    Unavailable,
}

impl AvailabilityFilter {
    pub fn parse(s: &str) -> Option<AvailabilityFilter> {
        match s {
            "all" | "" => Some(AvailabilityFilter::All),
            "available" => Some(AvailabilityFilter::Available),
            "unavailable" => Some(AvailabilityFilter::Unavailable),
            _ => None,
        }
    }

    pub fn matches(self, accepting_bookings: bool) -> bool {
        match self {
            AvailabilityFilter::All => true,
            AvailabilityFilter::Available => accepting_bookings,
            AvailabilityFilter::Unavailable => !accepting_bookings,
        }
    }
}

/// Directory search criteria.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VetSearch {
    /// Matched against name, specialty and location
    pub term: String,
    /// Substring of the specialty; `None` means any
    pub specialty: Option<String>,
    pub availability: AvailabilityFilter,
}

impl VetSearch {
    pub fn matches(&self, vet: &Vet) -> bool {
        let term = self.term.trim().to_lowercase();
        let matches_term = term.is_empty()
            || vet.name.to_lowercase().contains(&term)
            || vet.specialty.to_lowercase().contains(&term)
            || vet.location.to_lowercase().contains(&term);

        let matches_specialty = match &self.specialty {
            Some(s) => vet.specialty.to_lowercase().contains(&s.to_lowercase()),
            None => true,
        };

        matches_term && matches_specialty && self.availability.matches(vet.accepting_bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vet(name: &str, specialty: &str, location: &str, accepting: bool) -> Vet {
        let mut vet = Vet::new(name.into(), specialty.into(), location.into());
        vet.accepting_bookings = accepting;
        vet
    }

    #[test]
    fn test_search_term_matches_any_field() {
        let v = vet("Dr. Sarah Namuli", "Poultry Specialist", "Entebbe, Uganda", true);
        for term in ["namuli", "POULTRY", "entebbe", ""] {
            let search = VetSearch {
                term: term.into(),
                ..Default::default()
            };
            assert!(search.matches(&v), "term {term:?} should match");
        }
        let search = VetSearch {
            term: "jinja".into(),
            ..Default::default()
        };
        assert!(!search.matches(&v));
    }

    #[test]
    fn test_specialty_and_availability_filters() {
        let v = vet("Dr. David Okello", "General Veterinarian", "Jinja", false);
        let search = VetSearch {
            specialty: Some("general".into()),
            availability: AvailabilityFilter::Unavailable,
            ..Default::default()
        };
        assert!(search.matches(&v));

        let search = VetSearch {
            availability: AvailabilityFilter::Available,
            ..Default::default()
        };
        assert!(!search.matches(&v));
    }
}
