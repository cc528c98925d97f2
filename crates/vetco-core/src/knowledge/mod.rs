//! Livestock disease knowledge hub.

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Acknowledged, Disease, Notice};
use crate::validation::{is_blank, ValidationError};

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Disease not found: {0}")]
    NotFound(i64),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

pub struct KnowledgeHub<'a> {
    db: &'a Database,
}

impl<'a> KnowledgeHub<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> KnowledgeResult<Vec<Disease>> {
        Ok(self.db.list_diseases()?)
    }

    /// Entries whose name, description or symptoms mention `term`.
    pub fn search(&self, term: &str) -> KnowledgeResult<Vec<Disease>> {
        let term = term.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|d| {
                term.is_empty()
                    || d.name.to_lowercase().contains(&term)
                    || d.description.to_lowercase().contains(&term)
                    || d.symptoms.to_lowercase().contains(&term)
            })
            .collect())
    }

    /// Add an entry. The `id` of `disease` is ignored.
    pub fn add(&self, disease: &Disease) -> KnowledgeResult<Acknowledged<Disease>> {
        if is_blank(&disease.name) {
            return Err(ValidationError::DiseaseNameRequired.into());
        }
        let mut disease = disease.clone();
        disease.name = disease.name.trim().to_string();
        disease.id = self.db.insert_disease(&disease)?;
        log::info!("Added disease {} ({})", disease.id, disease.name);

        Ok(Acknowledged::new(
            disease,
            Notice::new(
                "Disease added",
                "The new disease has been added to the knowledge hub.",
            ),
        ))
    }

    pub fn update(&self, disease: &Disease) -> KnowledgeResult<Acknowledged<Disease>> {
        if is_blank(&disease.name) {
            return Err(ValidationError::DiseaseNameRequired.into());
        }
        let mut disease = disease.clone();
        disease.name = disease.name.trim().to_string();
        if !self.db.update_disease(&disease)? {
            return Err(KnowledgeError::NotFound(disease.id));
        }
        log::info!("Updated disease {}", disease.id);

        Ok(Acknowledged::new(
            disease,
            Notice::new(
                "Disease information updated",
                "The disease information has been updated successfully.",
            ),
        ))
    }

    pub fn delete(&self, id: i64) -> KnowledgeResult<Notice> {
        if !self.db.delete_disease(id)? {
            return Err(KnowledgeError::NotFound(id));
        }
        log::info!("Removed disease {}", id);
        Ok(Notice::new(
            "Disease removed",
            "The disease has been removed from the knowledge hub.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brucellosis() -> Disease {
        Disease {
            name: "Brucellosis".into(),
            description: "A bacterial infection that affects cattle, goats, and other livestock."
                .into(),
            symptoms: "Abortions in females, reduced milk production.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_requires_name() {
        let db = Database::open_in_memory().unwrap();
        let hub = KnowledgeHub::new(&db);

        let nameless = Disease {
            name: "  ".into(),
            ..Default::default()
        };
        let err = hub.add(&nameless).unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::Validation(ValidationError::DiseaseNameRequired)
        ));
        assert!(hub.list().unwrap().is_empty());
    }

    #[test]
    fn test_crud() {
        let db = Database::open_in_memory().unwrap();
        let hub = KnowledgeHub::new(&db);

        let added = hub.add(&brucellosis()).unwrap();
        assert_eq!(added.notice.title, "Disease added");

        let mut edited = added.value.clone();
        edited.treatment = "Antibiotics; infected animals are often culled.".into();
        let updated = hub.update(&edited).unwrap();
        assert_eq!(updated.notice.title, "Disease information updated");
        assert_eq!(hub.list().unwrap(), vec![edited.clone()]);

        edited.name = String::new();
        assert!(hub.update(&edited).is_err());

        assert_eq!(hub.search("milk").unwrap().len(), 1);
        assert!(hub.search("fever").unwrap().is_empty());

        hub.delete(added.value.id).unwrap();
        assert!(matches!(
            hub.delete(added.value.id),
            Err(KnowledgeError::NotFound(_))
        ));
    }
}
