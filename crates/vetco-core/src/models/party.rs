//! Farmer and vet identities.

use serde::{Deserialize, Serialize};

/// A livestock farmer (the customer role).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farmer {
    /// Stable identifier (e.g. "farmer-001")
    pub id: String,
    /// Display name
    pub name: String,
    /// Home location (e.g. "Kampala, Uganda")
    pub location: String,
    /// Contact phone number
    pub phone: String,
    /// Avatar image URL
    pub avatar: Option<String>,
}

impl Farmer {
    /// Create a new farmer with a generated id.
    pub fn new(name: String, location: String, phone: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            location,
            phone,
            avatar: None,
        }
    }

    /// The counterpart summary embedded in vet-facing views.
    pub fn summary(&self) -> FarmerSummary {
        FarmerSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            phone: self.phone.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// A veterinarian (the service-provider role).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vet {
    /// Stable identifier (e.g. "vet-001")
    pub id: String,
    /// Display name
    pub name: String,
    /// Specialty (e.g. "Large Animal Specialist")
    pub specialty: String,
    /// Practice location
    pub location: String,
    /// Average rating, 0.0 - 5.0
    pub rating: f64,
    /// Number of reviews behind the rating
    pub reviews: u32,
    /// Short biography
    pub bio: String,
    /// Avatar image URL
    pub avatar: Option<String>,
    /// Whether farmers can currently book this vet
    pub accepting_bookings: bool,
    /// Advertised slots shown in the directory (e.g. "9:00 AM")
    pub available_times: Vec<String>,
}

impl Vet {
    /// Create a new vet with a generated id, accepting bookings.
    pub fn new(name: String, specialty: String, location: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            specialty,
            location,
            rating: 0.0,
            reviews: 0,
            bio: String::new(),
            avatar: None,
            accepting_bookings: true,
            available_times: Vec::new(),
        }
    }

    /// The counterpart summary embedded in farmer-facing views.
    pub fn summary(&self) -> VetSummary {
        VetSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            specialty: self.specialty.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Farmer details as seen by a vet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmerSummary {
    pub id: String,
    pub name: String,
    pub location: String,
    pub phone: String,
    pub avatar: Option<String>,
}

/// Vet details as seen by a farmer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VetSummary {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub avatar: Option<String>,
}

/// Which side of the marketplace an actor is on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Farmer,
    Vet,
}

impl Role {
    /// The other side of a conversation.
    pub fn counterpart(self) -> Role {
        match self {
            Role::Farmer => Role::Vet,
            Role::Vet => Role::Farmer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Vet => "vet",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "farmer" => Some(Role::Farmer),
            "vet" => Some(Role::Vet),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_farmer() {
        let farmer = Farmer::new("John Doe".into(), "Kampala, Uganda".into(), "+256 700".into());
        assert_eq!(farmer.name, "John Doe");
        assert_eq!(farmer.id.len(), 36); // UUID format
        assert_eq!(farmer.summary().name, "John Doe");
    }

    #[test]
    fn test_new_vet_accepts_bookings() {
        let vet = Vet::new("Dr. Mukasa".into(), "Large Animal".into(), "Kampala".into());
        assert!(vet.accepting_bookings);
        assert_eq!(vet.summary().specialty, "Large Animal");
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse(Role::Vet.as_str()), Some(Role::Vet));
        assert_eq!(Role::Farmer.counterpart(), Role::Vet);
        assert_eq!(Role::parse("admin"), None);
    }
}
