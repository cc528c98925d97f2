//! Animal registry and health record database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date_column, Database, DbError, DbResult};
use crate::models::{calendar, Animal, Gender, HealthRecord, RecordType};

const RECORD_COLUMNS: &str = r#"
    id, animal_id, animal_name, animal_type, record_type, date, description, vet, notes
"#;

impl Database {
    /// Insert a new animal.
    pub fn insert_animal(&self, animal: &Animal) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO animals (id, farmer_id, name, animal_type, breed, birth_date, gender)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                animal.id,
                animal.farmer_id,
                animal.name,
                animal.animal_type,
                animal.breed,
                animal.birth_date.map(calendar::format_date),
                animal.gender.map(Gender::as_str),
            ],
        )?;
        Ok(())
    }

    /// Get an animal by its tag.
    pub fn get_animal(&self, id: &str) -> DbResult<Option<Animal>> {
        self.conn
            .query_row(
                r#"SELECT id, farmer_id, name, animal_type, breed, birth_date, gender
                   FROM animals WHERE id = ?"#,
                [id],
                AnimalRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Whether an animal with this tag exists.
    pub fn animal_exists(&self, id: &str) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM animals WHERE id = ?",
            [id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List a farmer's animals by tag.
    pub fn list_animals(&self, farmer_id: &str) -> DbResult<Vec<Animal>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, farmer_id, name, animal_type, breed, birth_date, gender
               FROM animals WHERE farmer_id = ? ORDER BY id"#,
        )?;

        let rows = stmt.query_map([farmer_id], AnimalRow::from_row)?;

        let mut animals = Vec::new();
        for row in rows {
            animals.push(row?.try_into()?);
        }
        Ok(animals)
    }

    /// Every animal tag in use, across all farmers.
    pub fn list_animal_ids(&self) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT id FROM animals ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Update an animal's mutable fields and rewrite the denormalized
    /// name/type on every record that references it, atomically.
    ///
    /// Returns the number of records rewritten, or `None` if the animal
    /// does not exist.
    pub fn update_animal(&self, animal: &Animal) -> DbResult<Option<usize>> {
        let tx = self.conn.unchecked_transaction()?;

        let rows_affected = tx.execute(
            r#"
            UPDATE animals SET
                name = ?2,
                animal_type = ?3,
                breed = ?4,
                birth_date = ?5,
                gender = ?6
            WHERE id = ?1
            "#,
            params![
                animal.id,
                animal.name,
                animal.animal_type,
                animal.breed,
                animal.birth_date.map(calendar::format_date),
                animal.gender.map(Gender::as_str),
            ],
        )?;
        if rows_affected == 0 {
            return Ok(None);
        }

        let records = tx.execute(
            "UPDATE health_records SET animal_name = ?2, animal_type = ?3 WHERE animal_id = ?1",
            params![animal.id, animal.name, animal.animal_type],
        )?;

        tx.commit()?;
        Ok(Some(records))
    }

    /// Delete an animal. The caller checks for referencing records first;
    /// the foreign key refuses the delete otherwise.
    pub fn delete_animal(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM animals WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Count the health records referencing an animal.
    pub fn count_records_for_animal(&self, animal_id: &str) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM health_records WHERE animal_id = ?",
            [animal_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Insert a health record, returning its assigned ID.
    pub fn insert_record(&self, record: &HealthRecord) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO health_records (
                animal_id, animal_name, animal_type, record_type, date, description, vet, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.animal_id,
                record.animal_name,
                record.animal_type,
                record.record_type.as_str(),
                calendar::format_date(record.date),
                record.description,
                record.vet,
                record.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a health record by ID.
    pub fn get_record(&self, id: i64) -> DbResult<Option<HealthRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM health_records WHERE id = ?", RECORD_COLUMNS),
                [id],
                RecordRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Overwrite a health record.
    pub fn update_record(&self, record: &HealthRecord) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE health_records SET
                animal_id = ?2,
                animal_name = ?3,
                animal_type = ?4,
                record_type = ?5,
                date = ?6,
                description = ?7,
                vet = ?8,
                notes = ?9
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.animal_id,
                record.animal_name,
                record.animal_type,
                record.record_type.as_str(),
                calendar::format_date(record.date),
                record.description,
                record.vet,
                record.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a health record.
    pub fn delete_record(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM health_records WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// List the records for a farmer's animals, newest first.
    pub fn list_records_for_farmer(&self, farmer_id: &str) -> DbResult<Vec<HealthRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.id, r.animal_id, r.animal_name, r.animal_type, r.record_type,
                   r.date, r.description, r.vet, r.notes
            FROM health_records r
            JOIN animals a ON a.id = r.animal_id
            WHERE a.farmer_id = ?
            ORDER BY r.date DESC, r.id DESC
            "#,
        )?;
        let rows = stmt.query_map([farmer_id], RecordRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }

    /// List the records for one animal, newest first.
    pub fn list_records_for_animal(&self, animal_id: &str) -> DbResult<Vec<HealthRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM health_records WHERE animal_id = ? ORDER BY date DESC, id DESC",
            RECORD_COLUMNS
        ))?;
        let rows = stmt.query_map([animal_id], RecordRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }
}

/// Intermediate row struct for database mapping.
struct AnimalRow {
    id: String,
    farmer_id: String,
    name: String,
    animal_type: String,
    breed: Option<String>,
    birth_date: Option<String>,
    gender: Option<String>,
}

impl AnimalRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AnimalRow {
            id: row.get(0)?,
            farmer_id: row.get(1)?,
            name: row.get(2)?,
            animal_type: row.get(3)?,
            breed: row.get(4)?,
            birth_date: row.get(5)?,
            gender: row.get(6)?,
        })
    }
}

impl TryFrom<AnimalRow> for Animal {
    type Error = DbError;

    fn try_from(row: AnimalRow) -> Result<Self, Self::Error> {
        let birth_date = row.birth_date.as_deref().map(parse_date_column).transpose()?;
        let gender = match row.gender.as_deref() {
            Some(g) => Some(
                Gender::parse(g)
                    .ok_or_else(|| DbError::Constraint(format!("Unknown gender: {}", g)))?,
            ),
            None => None,
        };

        Ok(Animal {
            id: row.id,
            farmer_id: row.farmer_id,
            name: row.name,
            animal_type: row.animal_type,
            breed: row.breed,
            birth_date,
            gender,
        })
    }
}

struct RecordRow {
    id: i64,
    animal_id: String,
    animal_name: String,
    animal_type: String,
    record_type: String,
    date: String,
    description: String,
    vet: String,
    notes: String,
}

impl RecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RecordRow {
            id: row.get(0)?,
            animal_id: row.get(1)?,
            animal_name: row.get(2)?,
            animal_type: row.get(3)?,
            record_type: row.get(4)?,
            date: row.get(5)?,
            description: row.get(6)?,
            vet: row.get(7)?,
            notes: row.get(8)?,
        })
    }
}

impl TryFrom<RecordRow> for HealthRecord {
    type Error = DbError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let record_type = RecordType::parse(&row.record_type).ok_or_else(|| {
            DbError::Constraint(format!("Unknown record type: {}", row.record_type))
        })?;

        Ok(HealthRecord {
            id: row.id,
            animal_id: row.animal_id,
            animal_name: row.animal_name,
            animal_type: row.animal_type,
            record_type,
            date: parse_date_column(&row.date)?,
            description: row.description,
            vet: row.vet,
            notes: row.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Farmer;

    fn setup_db() -> (Database, Farmer) {
        let db = Database::open_in_memory().unwrap();
        let farmer = Farmer::new("John Doe".into(), "Kampala".into(), "+256 700".into());
        db.insert_farmer(&farmer).unwrap();
        (db, farmer)
    }

    fn make_record(animal: &Animal, description: &str) -> HealthRecord {
        HealthRecord {
            id: 0,
            animal_id: animal.id.clone(),
            animal_name: animal.name.clone(),
            animal_type: animal.animal_type.clone(),
            record_type: RecordType::Vaccination,
            date: calendar::parse_date("2023-12-15").unwrap(),
            description: description.into(),
            vet: "Dr. Joseph Mukasa".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_insert_and_get_animal() {
        let (db, farmer) = setup_db();

        let mut animal = Animal::new("COW-001".into(), farmer.id.clone(), "Bella".into(), "Dairy Cow".into());
        animal.breed = Some("Friesian".into());
        animal.birth_date = calendar::parse_date("2020-03-15");
        animal.gender = Some(Gender::Female);
        db.insert_animal(&animal).unwrap();

        let retrieved = db.get_animal("COW-001").unwrap().unwrap();
        assert_eq!(retrieved, animal);
        assert!(db.animal_exists("COW-001").unwrap());
        assert!(!db.animal_exists("COW-404").unwrap());
    }

    #[test]
    fn test_duplicate_tag_refused() {
        let (db, farmer) = setup_db();

        let animal = Animal::new("GOAT-001".into(), farmer.id.clone(), "Billy".into(), "Goat".into());
        db.insert_animal(&animal).unwrap();
        assert!(db.insert_animal(&animal).is_err());
    }

    #[test]
    fn test_update_animal_rewrites_only_its_records() {
        let (db, farmer) = setup_db();

        let mut bella = Animal::new("COW-001".into(), farmer.id.clone(), "Bella".into(), "Dairy Cow".into());
        let daisy = Animal::new("COW-002".into(), farmer.id.clone(), "Daisy".into(), "Dairy Cow".into());
        db.insert_animal(&bella).unwrap();
        db.insert_animal(&daisy).unwrap();
        db.insert_record(&make_record(&bella, "ECF")).unwrap();
        db.insert_record(&make_record(&bella, "FMD")).unwrap();
        let daisy_record = db.insert_record(&make_record(&daisy, "ECF")).unwrap();

        bella.name = "Bella II".into();
        bella.animal_type = "Beef Cow".into();
        assert_eq!(db.update_animal(&bella).unwrap(), Some(2));

        for record in db.list_records_for_animal("COW-001").unwrap() {
            assert_eq!(record.animal_name, "Bella II");
            assert_eq!(record.animal_type, "Beef Cow");
        }
        assert_eq!(db.get_record(daisy_record).unwrap().unwrap().animal_name, "Daisy");

        let ghost = Animal::new("COW-404".into(), farmer.id.clone(), "Ghost".into(), "Cow".into());
        assert_eq!(db.update_animal(&ghost).unwrap(), None);
    }

    #[test]
    fn test_delete_referenced_animal_fails_at_store() {
        let (db, farmer) = setup_db();

        let animal = Animal::new("COW-001".into(), farmer.id.clone(), "Bella".into(), "Dairy Cow".into());
        db.insert_animal(&animal).unwrap();
        db.insert_record(&make_record(&animal, "ECF")).unwrap();

        assert_eq!(db.count_records_for_animal("COW-001").unwrap(), 1);
        assert!(db.delete_animal("COW-001").is_err());
        assert!(db.get_animal("COW-001").unwrap().is_some());
    }

    #[test]
    fn test_record_update_and_delete() {
        let (db, farmer) = setup_db();

        let animal = Animal::new("COW-001".into(), farmer.id.clone(), "Bella".into(), "Dairy Cow".into());
        db.insert_animal(&animal).unwrap();
        let id = db.insert_record(&make_record(&animal, "ECF")).unwrap();

        let mut record = db.get_record(id).unwrap().unwrap();
        record.record_type = RecordType::Deworming;
        record.notes = "Repeat in 3 months".into();
        assert!(db.update_record(&record).unwrap());
        assert_eq!(db.get_record(id).unwrap().unwrap().record_type, RecordType::Deworming);

        assert_eq!(db.list_records_for_farmer(&farmer.id).unwrap().len(), 1);
        assert!(db.delete_record(id).unwrap());
        assert!(db.get_record(id).unwrap().is_none());
        assert!(db.delete_animal("COW-001").unwrap());
    }
}
