//! Animal registry and health record models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An animal owned by a farmer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    /// Externally assigned tag (e.g. "COW-001"), immutable once registered
    pub id: String,
    /// Owning farmer
    pub farmer_id: String,
    pub name: String,
    /// Type (e.g. "Dairy Cow", "Goat")
    pub animal_type: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl Animal {
    /// Create an animal with the required fields.
    pub fn new(id: String, farmer_id: String, name: String, animal_type: String) -> Self {
        Self {
            id,
            farmer_id,
            name,
            animal_type,
            breed: None,
            birth_date: None,
            gender: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Kind of health event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecordType {
    Vaccination,
    Treatment,
    Examination,
    Surgery,
    Deworming,
    Other,
}

impl RecordType {
    pub const ALL: [RecordType; 6] = [
        RecordType::Vaccination,
        RecordType::Treatment,
        RecordType::Examination,
        RecordType::Surgery,
        RecordType::Deworming,
        RecordType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Vaccination => "Vaccination",
            RecordType::Treatment => "Treatment",
            RecordType::Examination => "Examination",
            RecordType::Surgery => "Surgery",
            RecordType::Deworming => "Deworming",
            RecordType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<RecordType> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// A health event for one animal.
///
/// `animal_name` and `animal_type` are denormalized copies of the animal's
/// fields, rewritten whenever the animal is edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    pub id: i64,
    pub animal_id: String,
    pub animal_name: String,
    pub animal_type: String,
    pub record_type: RecordType,
    pub date: NaiveDate,
    pub description: String,
    /// Attending vet, free text
    pub vet: String,
    pub notes: String,
}

/// Input for creating or editing a health record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecordInput {
    pub animal_id: String,
    /// One of the [`RecordType`] names
    pub record_type: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub description: String,
    pub vet: String,
    pub notes: String,
}

/// Input for registering or editing an animal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnimalInput {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub breed: String,
    /// `YYYY-MM-DD`, empty when unknown
    pub birth_date: String,
    /// "Male", "Female" or empty
    pub gender: String,
}
