use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;

pub fn upsert_profile(
    conn: &Connection,
    user_id: &Uuid,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_profiles (user_id, first_name, last_name)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name",
        params![user_id.to_string(), first_name, last_name],
    )?;
    Ok(())
}

/// Display name for reports: "First Last" with blank parts dropped.
/// `None` when the user has no profile or both names are blank.
pub fn fetch_patient_name(conn: &Connection, user_id: &Uuid) -> Result<Option<String>, DatabaseError> {
    let row: Option<(Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT first_name, last_name FROM user_profiles WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(row.and_then(|(first, last)| {
        let parts: Vec<&str> = [first.as_deref(), last.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }))
}
