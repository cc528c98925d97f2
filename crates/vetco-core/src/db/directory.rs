//! Per-farmer vet preference database operations.

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::VetPreference;

impl Database {
    /// Get a farmer's preference for one vet, if any has been stored.
    pub fn get_vet_preference(
        &self,
        farmer_id: &str,
        vet_id: &str,
    ) -> DbResult<Option<VetPreference>> {
        self.conn
            .query_row(
                r#"SELECT favorite, saved, note FROM vet_preferences
                   WHERE farmer_id = ?1 AND vet_id = ?2"#,
                params![farmer_id, vet_id],
                |row| {
                    Ok(VetPreference {
                        favorite: row.get(0)?,
                        saved: row.get(1)?,
                        note: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// All of a farmer's preferences, keyed by vet ID.
    pub fn list_vet_preferences(&self, farmer_id: &str) -> DbResult<HashMap<String, VetPreference>> {
        let mut stmt = self.conn.prepare(
            "SELECT vet_id, favorite, saved, note FROM vet_preferences WHERE farmer_id = ?",
        )?;
        let rows = stmt.query_map([farmer_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                VetPreference {
                    favorite: row.get(1)?,
                    saved: row.get(2)?,
                    note: row.get(3)?,
                },
            ))
        })?;
        rows.collect::<Result<HashMap<_, _>, _>>().map_err(Into::into)
    }

    /// Store a farmer's preference for a vet.
    pub fn upsert_vet_preference(
        &self,
        farmer_id: &str,
        vet_id: &str,
        preference: &VetPreference,
    ) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO vet_preferences (farmer_id, vet_id, favorite, saved, note)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (farmer_id, vet_id) DO UPDATE SET
                favorite = excluded.favorite,
                saved = excluded.saved,
                note = excluded.note
            "#,
            params![
                farmer_id,
                vet_id,
                preference.favorite,
                preference.saved,
                preference.note,
            ],
        )?;
        Ok(())
    }
}
