//! Disease reference database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Disease;

impl Database {
    /// Insert a disease entry, returning its assigned ID.
    pub fn insert_disease(&self, disease: &Disease) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO diseases (name, description, symptoms, treatment, prevention)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                disease.name,
                disease.description,
                disease.symptoms,
                disease.treatment,
                disease.prevention,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_disease(&self, id: i64) -> DbResult<Option<Disease>> {
        self.conn
            .query_row(
                r#"SELECT id, name, description, symptoms, treatment, prevention
                   FROM diseases WHERE id = ?"#,
                [id],
                disease_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All entries in insertion order.
    pub fn list_diseases(&self) -> DbResult<Vec<Disease>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, name, description, symptoms, treatment, prevention
               FROM diseases ORDER BY id"#,
        )?;
        let rows = stmt.query_map([], disease_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn update_disease(&self, disease: &Disease) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE diseases SET
                name = ?2,
                description = ?3,
                symptoms = ?4,
                treatment = ?5,
                prevention = ?6
            WHERE id = ?1
            "#,
            params![
                disease.id,
                disease.name,
                disease.description,
                disease.symptoms,
                disease.treatment,
                disease.prevention,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete_disease(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM diseases WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn disease_from_row(row: &Row<'_>) -> rusqlite::Result<Disease> {
    Ok(Disease {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        symptoms: row.get(3)?,
        treatment: row.get(4)?,
        prevention: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_crud() {
        let db = Database::open_in_memory().unwrap();

        let mut ecf = Disease {
            name: "East Coast Fever".into(),
            description: "Tick-borne disease of cattle".into(),
            ..Default::default()
        };
        ecf.id = db.insert_disease(&ecf).unwrap();
        assert_eq!(db.get_disease(ecf.id).unwrap(), Some(ecf.clone()));

        ecf.prevention = "Regular tick control".into();
        assert!(db.update_disease(&ecf).unwrap());
        assert_eq!(db.list_diseases().unwrap(), vec![ecf.clone()]);

        assert!(db.delete_disease(ecf.id).unwrap());
        assert!(!db.delete_disease(ecf.id).unwrap());
        assert!(db.list_diseases().unwrap().is_empty());
    }
}
