//! Vet directory: search plus a farmer's favorites, saved list and notes.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Acknowledged, Notice, Vet, VetListing, VetPreference, VetSearch};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Farmer not found: {0}")]
    FarmerNotFound(String),

    #[error("Vet not found: {0}")]
    VetNotFound(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

pub struct VetDirectory<'a> {
    db: &'a Database,
}

impl<'a> VetDirectory<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Vets matching `search`, each with this farmer's preferences.
    pub fn search(&self, farmer_id: &str, search: &VetSearch) -> DirectoryResult<Vec<VetListing>> {
        let mut preferences = self.db.list_vet_preferences(farmer_id)?;
        let listings: Vec<VetListing> = self
            .db
            .list_vets()?
            .into_iter()
            .filter(|vet| search.matches(vet))
            .map(|vet| {
                let preference = preferences.remove(&vet.id).unwrap_or_default();
                VetListing { vet, preference }
            })
            .collect();

        log::debug!("Directory search {:?}: {} vets", search.term, listings.len());
        Ok(listings)
    }

    /// Distinct specialties on offer, sorted.
    pub fn specialties(&self) -> DirectoryResult<Vec<String>> {
        let specialties: BTreeSet<String> = self
            .db
            .list_vets()?
            .into_iter()
            .map(|vet| vet.specialty)
            .filter(|s| !s.trim().is_empty())
            .collect();
        Ok(specialties.into_iter().collect())
    }

    /// The farmer's favorite vets.
    pub fn favorites(&self, farmer_id: &str) -> DirectoryResult<Vec<VetListing>> {
        Ok(self
            .search(farmer_id, &VetSearch::default())?
            .into_iter()
            .filter(|listing| listing.preference.favorite)
            .collect())
    }

    pub fn toggle_favorite(
        &self,
        farmer_id: &str,
        vet_id: &str,
    ) -> DirectoryResult<Acknowledged<VetPreference>> {
        let (vet, mut preference) = self.load(farmer_id, vet_id)?;
        preference.favorite = !preference.favorite;
        self.db.upsert_vet_preference(farmer_id, vet_id, &preference)?;
        log::info!("Farmer {} favorite {} = {}", farmer_id, vet_id, preference.favorite);

        let notice = if preference.favorite {
            Notice::new(
                "Added to favorites",
                format!("{} has been added to your favorites.", vet.name),
            )
        } else {
            Notice::new(
                "Removed from favorites",
                format!("{} has been removed from your favorites.", vet.name),
            )
        };
        Ok(Acknowledged::new(preference, notice))
    }

    pub fn toggle_saved(
        &self,
        farmer_id: &str,
        vet_id: &str,
    ) -> DirectoryResult<Acknowledged<VetPreference>> {
        let (vet, mut preference) = self.load(farmer_id, vet_id)?;
        preference.saved = !preference.saved;
        self.db.upsert_vet_preference(farmer_id, vet_id, &preference)?;
        log::info!("Farmer {} saved {} = {}", farmer_id, vet_id, preference.saved);

        let notice = if preference.saved {
            Notice::new(
                "Saved for later",
                format!("{} has been added to your saved list.", vet.name),
            )
        } else {
            Notice::new(
                "Removed from saved",
                format!("{} has been removed from your saved list.", vet.name),
            )
        };
        Ok(Acknowledged::new(preference, notice))
    }

    /// Replace the farmer's private note on a vet. An empty note clears it.
    pub fn set_note(
        &self,
        farmer_id: &str,
        vet_id: &str,
        note: &str,
    ) -> DirectoryResult<Acknowledged<VetPreference>> {
        let (_, mut preference) = self.load(farmer_id, vet_id)?;
        preference.note = note.to_string();
        self.db.upsert_vet_preference(farmer_id, vet_id, &preference)?;
        log::info!("Farmer {} updated note on {}", farmer_id, vet_id);

        Ok(Acknowledged::new(
            preference,
            Notice::new("Note saved", "Your note has been saved successfully."),
        ))
    }

    fn load(&self, farmer_id: &str, vet_id: &str) -> DirectoryResult<(Vet, VetPreference)> {
        if self.db.get_farmer(farmer_id)?.is_none() {
            return Err(DirectoryError::FarmerNotFound(farmer_id.to_string()));
        }
        let vet = self
            .db
            .get_vet(vet_id)?
            .ok_or_else(|| DirectoryError::VetNotFound(vet_id.to_string()))?;
        let preference = self
            .db
            .get_vet_preference(farmer_id, vet_id)?
            .unwrap_or_default();
        Ok((vet, preference))
    }
}
