use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{integer_value, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::MoodLevel;
use crate::models::DailyMood;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One mood per user per day: a second check-in on the same date replaces the first.
pub fn upsert_daily_mood(conn: &Connection, mood: &DailyMood) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO daily_mood (user_id, date, mood)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, date) DO UPDATE SET
            mood = excluded.mood,
            updated_at = datetime('now')",
        params![
            mood.user_id.to_string(),
            mood.date.format(DATE_FORMAT).to_string(),
            mood.mood.level(),
        ],
    )?;
    Ok(())
}

/// Moods with `start <= date <= end`, oldest first.
pub fn fetch_daily_moods(
    conn: &Connection,
    user_id: &Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyMood>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT user_id, date, mood FROM daily_mood
         WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date ASC",
    )?;

    let rows = stmt.query_map(
        params![
            user_id.to_string(),
            start.format(DATE_FORMAT).to_string(),
            end.format(DATE_FORMAT).to_string(),
        ],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Value>(2)?,
            ))
        },
    )?;

    let mut moods = Vec::new();
    for row in rows {
        let (user_id, date, mood) = row?;
        let parsed_date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|_| {
            DatabaseError::InvalidValue {
                field: "daily_mood.date".into(),
                value: date.clone(),
            }
        })?;
        moods.push(DailyMood {
            user_id: parse_uuid("daily_mood.user_id", &user_id)?,
            date: parsed_date,
            mood: MoodLevel::from_level(integer_value("daily_mood.mood", mood)?)?,
        });
    }
    Ok(moods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn upsert_replaces_same_day() {
        let conn = open_memory_database().unwrap();
        let user = Uuid::new_v4();
        upsert_daily_mood(&conn, &DailyMood { user_id: user, date: day(5), mood: MoodLevel::Rough }).unwrap();
        upsert_daily_mood(&conn, &DailyMood { user_id: user, date: day(5), mood: MoodLevel::Great }).unwrap();

        let moods = fetch_daily_moods(&conn, &user, day(1), day(31)).unwrap();
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].mood, MoodLevel::Great);
    }

    #[test]
    fn fetch_is_date_bounded_and_ordered() {
        let conn = open_memory_database().unwrap();
        let user = Uuid::new_v4();
        for (d, mood) in [(9, MoodLevel::Good), (2, MoodLevel::Okay), (20, MoodLevel::Rough)] {
            upsert_daily_mood(&conn, &DailyMood { user_id: user, date: day(d), mood }).unwrap();
        }

        let moods = fetch_daily_moods(&conn, &user, day(1), day(10)).unwrap();
        let dates: Vec<_> = moods.iter().map(|m| m.date).collect();
        assert_eq!(dates, vec![day(2), day(9)]);
    }

    #[test]
    fn out_of_range_mood_is_rejected() {
        let conn = open_memory_database().unwrap();
        let user = Uuid::new_v4();
        conn.execute(
            "INSERT INTO daily_mood (user_id, date, mood) VALUES (?1, '2026-01-04', 9)",
            params![user.to_string()],
        )
        .unwrap();

        let err = fetch_daily_moods(&conn, &user, day(1), day(31)).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidValue { .. }));
    }
}
