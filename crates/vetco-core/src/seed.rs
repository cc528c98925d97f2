//! Demo data set: three vets, five farmers and the records between them.
//!
//! Loaded when `database.seed_demo_data` is set. Loading into a database
//! that already has farmers is a no-op.

use chrono::{NaiveDate, NaiveTime};

use crate::db::{Database, DbError, DbResult};
use crate::models::{
    calendar, Animal, Appointment, AppointmentStatus, Disease, Farmer, Gender, HealthRecord,
    RecordType, Role, SpecialDate, Vet,
};

const AVATAR: &str = "/placeholder.svg?height=40&width=40";

pub const DEMO_VET_ID: &str = "vet-001";
pub const DEMO_FARMER_ID: &str = "farmer-001";

pub fn load_demo_data(db: &Database) -> DbResult<()> {
    if !db.list_farmers()?.is_empty() {
        log::debug!("Database already populated, skipping demo data");
        return Ok(());
    }

    let farmers = farmers();
    for farmer in &farmers {
        db.insert_farmer(farmer)?;
    }
    let vets = vets();
    for vet in &vets {
        db.insert_vet(vet)?;
    }

    seed_appointments(db, &farmers, &vets[0])?;
    seed_registry(db)?;
    seed_conversations(db)?;
    seed_availability(db)?;
    for disease in diseases() {
        db.insert_disease(&disease)?;
    }

    log::info!(
        "Loaded demo data: {} farmers, {} vets",
        farmers.len(),
        vets.len()
    );
    Ok(())
}

fn farmers() -> Vec<Farmer> {
    [
        ("farmer-001", "John Doe", "Kampala, Uganda", "+256 700 123 456"),
        ("farmer-002", "Sarah Namuli", "Entebbe, Uganda", "+256 701 234 567"),
        ("farmer-003", "David Okello", "Jinja, Uganda", "+256 702 345 678"),
        ("farmer-004", "Mary Auma", "Mbale, Uganda", "+256 703 456 789"),
        ("farmer-005", "Peter Ochieng", "Gulu, Uganda", "+256 704 567 890"),
    ]
    .into_iter()
    .map(|(id, name, location, phone)| Farmer {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        phone: phone.to_string(),
        avatar: Some(AVATAR.to_string()),
    })
    .collect()
}

fn vets() -> Vec<Vet> {
    let vet = |id: &str,
               name: &str,
               specialty: &str,
               location: &str,
               rating: f64,
               reviews: u32,
               accepting: bool,
               times: &[&str],
               bio: &str| Vet {
        id: id.to_string(),
        name: name.to_string(),
        specialty: specialty.to_string(),
        location: location.to_string(),
        rating,
        reviews,
        bio: bio.to_string(),
        avatar: Some("/placeholder.svg?height=80&width=80".to_string()),
        accepting_bookings: accepting,
        available_times: times.iter().map(|t| t.to_string()).collect(),
    };

    vec![
        vet(
            DEMO_VET_ID,
            "Dr. Joseph Mukasa",
            "Large Animal Specialist",
            "Kampala, Uganda",
            4.8,
            124,
            true,
            &["9:00 AM", "11:30 AM", "2:00 PM"],
            "Dr. Mukasa has over 15 years of experience treating cattle, goats, and other large farm animals.",
        ),
        vet(
            "vet-002",
            "Dr. Sarah Namuli",
            "Poultry Specialist",
            "Entebbe, Uganda",
            4.9,
            98,
            true,
            &["10:00 AM", "1:00 PM"],
            "Dr. Namuli is an expert in poultry health and disease management.",
        ),
        vet(
            "vet-003",
            "Dr. David Okello",
            "General Veterinarian",
            "Jinja, Uganda",
            4.7,
            156,
            false,
            &[],
            "Dr. Okello provides comprehensive veterinary care for all types of farm animals.",
        ),
    ]
}

fn date(s: &str) -> DbResult<NaiveDate> {
    calendar::parse_date(s).ok_or_else(|| DbError::Constraint(format!("Bad demo date: {}", s)))
}

fn time(s: &str) -> DbResult<NaiveTime> {
    calendar::parse_time(s).ok_or_else(|| DbError::Constraint(format!("Bad demo time: {}", s)))
}

fn seed_appointments(db: &Database, farmers: &[Farmer], vet: &Vet) -> DbResult<()> {
    let rows = [
        (
            "2023-12-15",
            "14:00",
            "Dairy Cow",
            "COW-001",
            "Vaccination for East Coast Fever",
            "",
            AppointmentStatus::Pending,
        ),
        (
            "2023-12-15",
            "16:30",
            "Goats (5)",
            "GOAT-HERD-002",
            "Routine health check and deworming",
            "",
            AppointmentStatus::Pending,
        ),
        (
            "2023-12-16",
            "10:00",
            "Poultry (200)",
            "POULTRY-FLOCK-003",
            "Suspected Newcastle disease outbreak",
            "Bring necessary vaccines and equipment for treatment",
            AppointmentStatus::Confirmed,
        ),
        (
            "2023-12-10",
            "09:00",
            "Dairy Cow",
            "COW-004",
            "Mastitis treatment",
            "Follow-up in 7 days to check progress",
            AppointmentStatus::Completed {
                diagnosis: "Acute mastitis in right rear quarter".to_string(),
                treatment:
                    "Administered intramammary antibiotics and anti-inflammatory medication"
                        .to_string(),
            },
        ),
        (
            "2023-12-08",
            "14:00",
            "Pig",
            "PIG-005",
            "Suspected African Swine Fever",
            "Cancelled due to scheduling conflict",
            AppointmentStatus::Cancelled {
                reason: "Scheduling conflict - referred to Dr. Namuli".to_string(),
            },
        ),
    ];

    let timestamp = "2023-12-01T08:00:00+00:00";
    for (farmer, (day, at, animal_type, animal_id, issue, notes, status)) in
        farmers.iter().zip(rows)
    {
        let appointment = Appointment {
            id: 0,
            farmer: farmer.summary(),
            vet: vet.summary(),
            date: date(day)?,
            time: time(at)?,
            location: "Farmer's Location".to_string(),
            animal_type: animal_type.to_string(),
            animal_id: Some(animal_id.to_string()),
            issue: issue.to_string(),
            notes: notes.to_string(),
            status,
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
        };
        db.insert_appointment(&appointment)?;
    }
    Ok(())
}

fn seed_registry(db: &Database) -> DbResult<()> {
    let animals = [
        ("COW-001", "Bessie", "Dairy Cow", "Holstein", "2020-05-12", Gender::Female),
        ("COW-002", "Daisy", "Dairy Cow", "Jersey", "2021-03-18", Gender::Female),
        ("GOAT-001", "Billy", "Goat", "Boer", "2022-01-05", Gender::Male),
    ];
    for (id, name, animal_type, breed, born, gender) in animals {
        let mut animal = Animal::new(
            id.to_string(),
            DEMO_FARMER_ID.to_string(),
            name.to_string(),
            animal_type.to_string(),
        );
        animal.breed = Some(breed.to_string());
        animal.birth_date = Some(date(born)?);
        animal.gender = Some(gender);
        db.insert_animal(&animal)?;
    }

    let records = [
        (
            "COW-001",
            "Bessie",
            RecordType::Vaccination,
            "2023-12-15",
            "Annual vaccination against East Coast Fever",
            "Dr. Joseph Mukasa",
            "Animal responded well to vaccination. Next dose due in 12 months.",
        ),
        (
            "COW-002",
            "Daisy",
            RecordType::Treatment,
            "2024-01-10",
            "Treatment for mastitis",
            "Dr. Sarah Namuli",
            "Administered antibiotics. Follow-up in 7 days to check progress.",
        ),
    ];
    for (animal_id, animal_name, record_type, day, description, vet, notes) in records {
        db.insert_record(&HealthRecord {
            id: 0,
            animal_id: animal_id.to_string(),
            animal_name: animal_name.to_string(),
            animal_type: "Dairy Cow".to_string(),
            record_type,
            date: date(day)?,
            description: description.to_string(),
            vet: vet.to_string(),
            notes: notes.to_string(),
        })?;
    }
    Ok(())
}

fn seed_conversations(db: &Database) -> DbResult<()> {
    let john = db.get_or_create_conversation(DEMO_FARMER_ID, DEMO_VET_ID)?;
    let thread = [
        (Role::Farmer, "10:30", "Hello Dr. Mukasa, I have an appointment scheduled for tomorrow at 10:00 AM for my dairy cow's vaccination."),
        (Role::Vet, "10:32", "Hello John, yes I have it in my schedule. I'll be coming to your farm for the East Coast Fever vaccination."),
        (Role::Farmer, "10:35", "Great! Is there anything specific I need to prepare before you arrive?"),
        (Role::Vet, "10:38", "Please ensure the cow is restrained properly for the vaccination. Also, have her health records ready for me to review and update."),
        (Role::Farmer, "10:40", "I'll make sure everything is ready. Thank you!"),
        (Role::Vet, "10:45", "Perfect. Also, please keep the cow in a shaded area as they might experience mild fever after vaccination. I'll bring all the necessary equipment and vaccines."),
        (Role::Farmer, "10:50", "I'll be ready for the appointment tomorrow. Do I need to prepare anything specific?"),
    ];
    for (sender, at, text) in thread {
        db.append_message(john, sender, text, &format!("2023-12-14T{}:00+00:00", at))?;
    }

    let previews = [
        (
            "farmer-002",
            "2023-12-13T15:00:00+00:00",
            "Thank you for the information about deworming. I'll make sure to follow your instructions.",
            true,
        ),
        (
            "farmer-003",
            "2023-12-12T09:00:00+00:00",
            "I'm concerned about the symptoms my chickens are showing. Can we discuss this before our appointment?",
            false,
        ),
        (
            "farmer-004",
            "2023-12-07T11:00:00+00:00",
            "The treatment you prescribed is working well. The cow is recovering nicely.",
            false,
        ),
    ];
    for (farmer_id, sent_at, text, unread) in previews {
        let conversation = db.get_or_create_conversation(farmer_id, DEMO_VET_ID)?;
        db.append_message(conversation, Role::Farmer, text, sent_at)?;
        if !unread {
            db.mark_conversation_read(conversation, Role::Vet)?;
        }
    }
    Ok(())
}

fn seed_availability(db: &Database) -> DbResult<()> {
    for (name, radius_km, is_default) in [
        ("Kampala Central", 15, true),
        ("Entebbe Area", 20, false),
        ("Jinja District", 25, false),
    ] {
        db.insert_service_location(DEMO_VET_ID, name, radius_km, is_default)?;
    }

    for (name, duration, price) in [
        ("General Check-up", 30, 50_000),
        ("Vaccination", 15, 30_000),
        ("Deworming", 15, 25_000),
        ("Pregnancy Diagnosis", 45, 60_000),
        ("Emergency Visit", 60, 100_000),
    ] {
        db.insert_service_offering(DEMO_VET_ID, name, duration, price)?;
    }

    for (day, reason) in [
        ("2023-12-25", "Christmas Day"),
        ("2023-12-26", "Boxing Day"),
        ("2024-01-01", "New Year's Day"),
    ] {
        db.insert_special_date(
            DEMO_VET_ID,
            &SpecialDate {
                date: date(day)?,
                available: false,
                reason: reason.to_string(),
            },
        )?;
    }
    Ok(())
}

fn diseases() -> Vec<Disease> {
    vec![
        Disease {
            id: 0,
            name: "East Coast Fever".to_string(),
            description: "A tick-borne disease affecting cattle in Uganda.".to_string(),
            symptoms: "High fever, swollen lymph nodes, difficulty breathing, and nasal discharge."
                .to_string(),
            treatment: "Early treatment with antiprotozoal drugs like buparvaquone. Consult a vet immediately upon suspicion.".to_string(),
            prevention: "Regular tick control through dipping or spraying cattle with acaricides. Immunization is also available.".to_string(),
        },
        Disease {
            id: 0,
            name: "Foot and Mouth Disease".to_string(),
            description: "A highly contagious viral disease affecting cloven-hoofed animals."
                .to_string(),
            symptoms: "Fever, blisters on the mouth, tongue, feet, and teats. Excessive salivation and lameness.".to_string(),
            treatment: "No specific treatment. Supportive care to prevent secondary infections."
                .to_string(),
            prevention: "Regular vaccination. Strict biosecurity measures and movement control during outbreaks.".to_string(),
        },
        Disease {
            id: 0,
            name: "Brucellosis".to_string(),
            description: "A bacterial infection that affects cattle, goats, and other livestock."
                .to_string(),
            symptoms: "Abortions in females, swollen testicles in males, reduced milk production, and infertility.".to_string(),
            treatment: "Antibiotics can be used, but infected animals are often culled to prevent spread.".to_string(),
            prevention: "Vaccination of young animals. Testing and removal of infected animals. Proper disposal of aborted fetuses.".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusBucket;

    #[test]
    fn test_demo_data_loads_once() {
        let db = Database::open_in_memory().unwrap();
        load_demo_data(&db).unwrap();
        load_demo_data(&db).unwrap();

        assert_eq!(db.list_farmers().unwrap().len(), 5);
        assert_eq!(db.list_vets().unwrap().len(), 3);
        for bucket in StatusBucket::ALL {
            assert!(!db.list_vet_bucket(DEMO_VET_ID, bucket).unwrap().is_empty());
        }
        assert_eq!(db.list_vet_bucket(DEMO_VET_ID, StatusBucket::Pending).unwrap().len(), 2);
        assert_eq!(db.list_animals(DEMO_FARMER_ID).unwrap().len(), 3);
        assert_eq!(db.list_diseases().unwrap().len(), 3);
    }

    #[test]
    fn test_demo_conversations() {
        let db = Database::open_in_memory().unwrap();
        load_demo_data(&db).unwrap();

        let conversations = db.list_conversations(Role::Vet, DEMO_VET_ID).unwrap();
        assert_eq!(conversations.len(), 4);
        let unread = conversations
            .iter()
            .filter(|c| c.is_unread_for(Role::Vet))
            .count();
        assert_eq!(unread, 2);

        let settings = db.get_availability_settings(DEMO_VET_ID).unwrap().unwrap();
        assert_eq!(settings.locations.len(), 3);
        assert_eq!(settings.services.len(), 5);
        assert_eq!(settings.special_dates.len(), 3);
    }
}
