//! Animal registry and health records.
//!
//! Records carry a copy of their animal's name and type. The copies are
//! rewritten inside the same transaction as every animal edit, and an
//! animal cannot be deleted while records still reference it.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{
    calendar, Acknowledged, Animal, AnimalInput, Gender, HealthRecord, Notice, RecordInput,
    RecordType,
};
use crate::validation::{is_blank, parse_date_input, require_fields, ValidationError};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Farmer not found: {0}")]
    FarmerNotFound(String),

    #[error("Animal not found: {0}")]
    AnimalNotFound(String),

    #[error("Health record not found: {0}")]
    RecordNotFound(i64),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

pub struct Registry<'a> {
    db: &'a Database,
}

impl<'a> Registry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn animals(&self, farmer_id: &str) -> RegistryResult<Vec<Animal>> {
        Ok(self.db.list_animals(farmer_id)?)
    }

    pub fn records(&self, farmer_id: &str) -> RegistryResult<Vec<HealthRecord>> {
        Ok(self.db.list_records_for_farmer(farmer_id)?)
    }

    pub fn records_for_animal(&self, animal_id: &str) -> RegistryResult<Vec<HealthRecord>> {
        Ok(self.db.list_records_for_animal(animal_id)?)
    }

    /// Suggest an unused `ANIMAL-NNN` tag.
    pub fn suggest_animal_id<R: Rng>(&self, rng: &mut R) -> RegistryResult<String> {
        let taken: HashSet<String> = self.db.list_animal_ids()?.into_iter().collect();

        for _ in 0..32 {
            let candidate = format!("ANIMAL-{:03}", rng.gen_range(0..1000));
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
        }
        // Dense registry: take the first free number instead
        Ok((0..1000)
            .map(|n| format!("ANIMAL-{:03}", n))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| format!("ANIMAL-{}", uuid::Uuid::new_v4().simple())))
    }

    /// Register an animal under a farmer. The tag must be unused.
    pub fn add_animal(
        &self,
        farmer_id: &str,
        input: &AnimalInput,
    ) -> RegistryResult<Acknowledged<Animal>> {
        require_fields(&[
            ("id", input.id.as_str()),
            ("name", input.name.as_str()),
            ("type", input.animal_type.as_str()),
        ])?;
        let mut animal = Animal::new(
            input.id.trim().to_string(),
            farmer_id.to_string(),
            input.name.trim().to_string(),
            input.animal_type.trim().to_string(),
        );
        apply_optional_fields(&mut animal, input)?;

        if self.db.get_farmer(farmer_id)?.is_none() {
            return Err(RegistryError::FarmerNotFound(farmer_id.to_string()));
        }
        if self.db.animal_exists(&animal.id)? {
            log::warn!("Refused duplicate animal id {}", animal.id);
            return Err(ValidationError::DuplicateAnimalId(animal.id).into());
        }

        self.db.insert_animal(&animal)?;
        log::info!("Registered animal {} for farmer {}", animal.id, farmer_id);
        Ok(Acknowledged::new(
            animal,
            Notice::new("Animal added", "The animal has been added successfully."),
        ))
    }

    /// Edit an animal. The tag in `input` selects the animal and cannot be
    /// changed. Name and type are copied onto every record of this animal.
    pub fn edit_animal(&self, input: &AnimalInput) -> RegistryResult<Acknowledged<Animal>> {
        require_fields(&[("name", input.name.as_str()), ("type", input.animal_type.as_str())])?;
        let id = input.id.trim();

        let mut animal = self
            .db
            .get_animal(id)?
            .ok_or_else(|| RegistryError::AnimalNotFound(id.to_string()))?;
        animal.name = input.name.trim().to_string();
        animal.animal_type = input.animal_type.trim().to_string();
        apply_optional_fields(&mut animal, input)?;

        let rewritten = self
            .db
            .update_animal(&animal)?
            .ok_or_else(|| RegistryError::AnimalNotFound(animal.id.clone()))?;
        log::info!("Updated animal {} ({} records rewritten)", animal.id, rewritten);

        Ok(Acknowledged::new(
            animal,
            Notice::new(
                "Animal updated",
                "The animal information has been updated successfully.",
            ),
        ))
    }

    /// Delete an animal with no health records.
    pub fn delete_animal(&self, id: &str) -> RegistryResult<Notice> {
        if !self.db.animal_exists(id)? {
            return Err(RegistryError::AnimalNotFound(id.to_string()));
        }
        if self.db.count_records_for_animal(id)? > 0 {
            log::warn!("Refused delete of animal {}: has records", id);
            return Err(ValidationError::AnimalHasRecords(id.to_string()).into());
        }

        self.db.delete_animal(id)?;
        log::info!("Deleted animal {}", id);
        Ok(Notice::new("Animal deleted", "The animal has been deleted successfully."))
    }

    pub fn add_record(&self, input: &RecordInput) -> RegistryResult<Acknowledged<HealthRecord>> {
        let mut record = self.build_record(input)?;
        record.id = self.db.insert_record(&record)?;
        log::info!("Added {} record {} for {}", record.record_type.as_str(), record.id, record.animal_id);

        Ok(Acknowledged::new(
            record,
            Notice::new("Record added", "The health record has been added successfully."),
        ))
    }

    pub fn edit_record(
        &self,
        id: i64,
        input: &RecordInput,
    ) -> RegistryResult<Acknowledged<HealthRecord>> {
        if self.db.get_record(id)?.is_none() {
            return Err(RegistryError::RecordNotFound(id));
        }
        let mut record = self.build_record(input)?;
        record.id = id;

        self.db.update_record(&record)?;
        log::info!("Updated record {}", id);
        Ok(Acknowledged::new(
            record,
            Notice::new("Record updated", "The health record has been updated successfully."),
        ))
    }

    pub fn delete_record(&self, id: i64) -> RegistryResult<Notice> {
        if !self.db.delete_record(id)? {
            return Err(RegistryError::RecordNotFound(id));
        }
        log::info!("Deleted record {}", id);
        Ok(Notice::new("Record deleted", "The health record has been deleted successfully."))
    }

    /// Validate a record input and copy the animal's name and type onto it.
    fn build_record(&self, input: &RecordInput) -> RegistryResult<HealthRecord> {
        require_fields(&[
            ("animal", input.animal_id.as_str()),
            ("type", input.record_type.as_str()),
            ("date", input.date.as_str()),
            ("description", input.description.as_str()),
        ])?;
        let record_type = RecordType::parse(&input.record_type)
            .ok_or_else(|| ValidationError::UnknownRecordType(input.record_type.clone()))?;
        let date = parse_date_input(&input.date)?;

        let animal_id = input.animal_id.trim();
        let animal = self
            .db
            .get_animal(animal_id)?
            .ok_or_else(|| ValidationError::UnknownAnimal(animal_id.to_string()))?;

        Ok(HealthRecord {
            id: 0,
            animal_id: animal.id,
            animal_name: animal.name,
            animal_type: animal.animal_type,
            record_type,
            date,
            description: input.description.trim().to_string(),
            vet: input.vet.trim().to_string(),
            notes: input.notes.clone(),
        })
    }
}

/// Breed, birth date and gender are optional; blank clears them.
fn apply_optional_fields(animal: &mut Animal, input: &AnimalInput) -> Result<(), ValidationError> {
    animal.breed = (!is_blank(&input.breed)).then(|| input.breed.trim().to_string());
    animal.birth_date = if is_blank(&input.birth_date) {
        None
    } else {
        Some(parse_date_input(&input.birth_date)?)
    };
    animal.gender = if is_blank(&input.gender) {
        None
    } else {
        Some(
            Gender::parse(&input.gender)
                .ok_or_else(|| ValidationError::UnknownGender(input.gender.clone()))?,
        )
    };
    Ok(())
}

/// Age in whole years on `today`, as the registry table shows it.
pub fn age_in_years(animal: &Animal, today: NaiveDate) -> Option<u32> {
    let born = animal.birth_date?;
    if born > today {
        return None;
    }
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Display label for a record date, e.g. "Friday, Dec 15".
pub fn record_date_label(record: &HealthRecord) -> String {
    calendar::format_date_long(record.date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Farmer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Database, Farmer) {
        let db = Database::open_in_memory().unwrap();
        let farmer = Farmer::new("John Doe".into(), "Kampala".into(), "+256 700".into());
        db.insert_farmer(&farmer).unwrap();
        (db, farmer)
    }

    fn bella() -> AnimalInput {
        AnimalInput {
            id: "COW-001".into(),
            name: "Bella".into(),
            animal_type: "Dairy Cow".into(),
            breed: "Friesian".into(),
            birth_date: "2020-03-15".into(),
            gender: "Female".into(),
        }
    }

    fn vaccination(animal_id: &str) -> RecordInput {
        RecordInput {
            animal_id: animal_id.into(),
            record_type: "Vaccination".into(),
            date: "2023-12-15".into(),
            description: "East Coast Fever vaccination".into(),
            vet: "Dr. Joseph Mukasa".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_add_animal_validates() {
        let (db, farmer) = setup();
        let registry = Registry::new(&db);

        let mut input = bella();
        input.name = " ".into();
        assert!(matches!(
            registry.add_animal(&farmer.id, &input),
            Err(RegistryError::Validation(ValidationError::MissingFields(_)))
        ));

        let ack = registry.add_animal(&farmer.id, &bella()).unwrap();
        assert_eq!(ack.value.gender, Some(Gender::Female));
        assert!(matches!(
            registry.add_animal(&farmer.id, &bella()),
            Err(RegistryError::Validation(ValidationError::DuplicateAnimalId(_)))
        ));

        input = bella();
        input.id = "COW-002".into();
        input.gender = "Unknown".into();
        assert!(matches!(
            registry.add_animal(&farmer.id, &input),
            Err(RegistryError::Validation(ValidationError::UnknownGender(_)))
        ));
    }

    #[test]
    fn test_record_requires_existing_animal() {
        let (db, _) = setup();
        let registry = Registry::new(&db);

        assert!(matches!(
            registry.add_record(&vaccination("COW-404")),
            Err(RegistryError::Validation(ValidationError::UnknownAnimal(_)))
        ));

        let mut input = vaccination("COW-404");
        input.record_type = "Grooming".into();
        assert!(matches!(
            registry.add_record(&input),
            Err(RegistryError::Validation(ValidationError::UnknownRecordType(_)))
        ));
    }

    #[test]
    fn test_record_copies_animal_fields() {
        let (db, farmer) = setup();
        let registry = Registry::new(&db);
        registry.add_animal(&farmer.id, &bella()).unwrap();

        let record = registry.add_record(&vaccination("COW-001")).unwrap().value;
        assert_eq!(record.animal_name, "Bella");
        assert_eq!(record.animal_type, "Dairy Cow");
        assert_eq!(record_date_label(&record), "Friday, Dec 15");

        let mut input = vaccination("COW-001");
        input.record_type = "deworming".into();
        let edited = registry.edit_record(record.id, &input).unwrap().value;
        assert_eq!(edited.record_type, RecordType::Deworming);
        assert!(matches!(
            registry.edit_record(999, &input),
            Err(RegistryError::RecordNotFound(999))
        ));
    }

    #[test]
    fn test_delete_guarded_by_records() {
        let (db, farmer) = setup();
        let registry = Registry::new(&db);
        registry.add_animal(&farmer.id, &bella()).unwrap();
        let record = registry.add_record(&vaccination("COW-001")).unwrap().value;

        assert!(matches!(
            registry.delete_animal("COW-001"),
            Err(RegistryError::Validation(ValidationError::AnimalHasRecords(_)))
        ));

        registry.delete_record(record.id).unwrap();
        let notice = registry.delete_animal("COW-001").unwrap();
        assert_eq!(notice.title, "Animal deleted");
        assert!(registry.animals(&farmer.id).unwrap().is_empty());
    }

    #[test]
    fn test_suggested_ids_are_free() {
        let (db, farmer) = setup();
        let registry = Registry::new(&db);
        let mut rng = StdRng::seed_from_u64(3);

        let suggested = registry.suggest_animal_id(&mut rng).unwrap();
        assert!(suggested.starts_with("ANIMAL-"));
        assert_eq!(suggested.len(), "ANIMAL-000".len());

        let mut input = bella();
        input.id = suggested.clone();
        registry.add_animal(&farmer.id, &input).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        assert_ne!(registry.suggest_animal_id(&mut rng).unwrap(), suggested);
    }

    #[test]
    fn test_age_in_years() {
        let (db, farmer) = setup();
        let registry = Registry::new(&db);
        let animal = registry.add_animal(&farmer.id, &bella()).unwrap().value;

        let today = calendar::parse_date("2023-12-15").unwrap();
        assert_eq!(age_in_years(&animal, today), Some(3));
    }
}
