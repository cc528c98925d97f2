//! Animal registry integration tests.

use vetco_core::db::Database;
use vetco_core::models::{AnimalInput, Farmer, RecordInput};
use vetco_core::records::{Registry, RegistryError};
use vetco_core::validation::ValidationError;

fn setup() -> (Database, Farmer) {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::open_in_memory().unwrap();
    let farmer = Farmer::new(
        "John Doe".to_string(),
        "Kampala, Uganda".to_string(),
        "+256 700 123 456".to_string(),
    );
    db.insert_farmer(&farmer).unwrap();
    (db, farmer)
}

fn animal(id: &str, name: &str, animal_type: &str) -> AnimalInput {
    AnimalInput {
        id: id.to_string(),
        name: name.to_string(),
        animal_type: animal_type.to_string(),
        ..Default::default()
    }
}

fn record(animal_id: &str, description: &str) -> RecordInput {
    RecordInput {
        animal_id: animal_id.to_string(),
        record_type: "Examination".to_string(),
        date: "2023-12-15".to_string(),
        description: description.to_string(),
        vet: "Dr. Joseph Mukasa".to_string(),
        notes: String::new(),
    }
}

#[test]
fn test_rename_propagates_to_records() -> anyhow::Result<()> {
    let (db, farmer) = setup();
    let registry = Registry::new(&db);

    registry.add_animal(&farmer.id, &animal("COW-009", "Luna", "Dairy Cow"))?;
    let added = registry.add_record(&record("COW-009", "Routine check"))?;
    assert_eq!(added.value.animal_name, "Luna");

    let ack = registry.edit_animal(&animal("COW-009", "Luna2", "Dairy Cow"))?;
    assert_eq!(ack.notice.title, "Animal updated");

    let records = registry.records_for_animal("COW-009")?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].animal_name, "Luna2");
    Ok(())
}

#[test]
fn test_edit_touches_only_that_animals_records() {
    let (db, farmer) = setup();
    let registry = Registry::new(&db);

    registry
        .add_animal(&farmer.id, &animal("COW-001", "Bessie", "Dairy Cow"))
        .unwrap();
    registry
        .add_animal(&farmer.id, &animal("GOAT-001", "Billy", "Goat"))
        .unwrap();
    registry.add_record(&record("COW-001", "Vaccination")).unwrap();
    registry.add_record(&record("COW-001", "Follow-up")).unwrap();
    registry.add_record(&record("GOAT-001", "Deworming")).unwrap();

    registry
        .edit_animal(&animal("COW-001", "Bessie", "Beef Cow"))
        .unwrap();

    let records = registry.records(&farmer.id).unwrap();
    assert_eq!(records.len(), 3);
    for r in &records {
        match r.animal_id.as_str() {
            "COW-001" => assert_eq!((r.animal_name.as_str(), r.animal_type.as_str()), ("Bessie", "Beef Cow")),
            "GOAT-001" => assert_eq!((r.animal_name.as_str(), r.animal_type.as_str()), ("Billy", "Goat")),
            other => panic!("unexpected animal {other}"),
        }
    }
}

#[test]
fn test_referenced_animal_cannot_be_deleted() {
    let (db, farmer) = setup();
    let registry = Registry::new(&db);

    let before = registry
        .add_animal(&farmer.id, &animal("COW-001", "Bessie", "Dairy Cow"))
        .unwrap()
        .value;
    let rec = registry.add_record(&record("COW-001", "Vaccination")).unwrap().value;

    let err = registry.delete_animal("COW-001").unwrap_err();
    match &err {
        RegistryError::Validation(v @ ValidationError::AnimalHasRecords(_)) => {
            let notice = v.notice();
            assert_eq!(notice.title, "Cannot delete");
            assert_eq!(
                notice.description,
                "This animal has health records. Delete the records first."
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(registry.animals(&farmer.id).unwrap(), vec![before]);
    assert_eq!(registry.records_for_animal("COW-001").unwrap().len(), 1);

    registry.delete_record(rec.id).unwrap();
    registry.delete_animal("COW-001").unwrap();
    assert!(registry.animals(&farmer.id).unwrap().is_empty());
}

#[test]
fn test_missing_fields_change_nothing() {
    let (db, farmer) = setup();
    let registry = Registry::new(&db);

    let err = registry
        .add_animal(&farmer.id, &animal("", "Luna", ""))
        .unwrap_err();
    match err {
        RegistryError::Validation(ValidationError::MissingFields(fields)) => {
            assert_eq!(fields, "id, type")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(registry.animals(&farmer.id).unwrap().is_empty());

    registry
        .add_animal(&farmer.id, &animal("COW-001", "Bessie", "Dairy Cow"))
        .unwrap();
    let err = registry.add_record(&record("COW-001", "  ")).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::MissingFields(_))
    ));
    assert!(registry.records(&farmer.id).unwrap().is_empty());
}
