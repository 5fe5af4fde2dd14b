use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{
    decode_tags, encode_tags, format_timestamp, in_range, integer_value, padded_bounds, parse_timestamp,
    parse_uuid,
};
use crate::db::DatabaseError;
use crate::models::catalogue::DEFAULT_SYMPTOMS;
use crate::models::enums::Severity;
use crate::models::{Symptom, SymptomLog};

// ═══════════════════════════════════════════
// Symptoms
// ═══════════════════════════════════════════

pub fn insert_symptom(conn: &Connection, symptom: &Symptom) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptoms (id, user_id, name, icon, is_default)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            symptom.id.to_string(),
            symptom.user_id.to_string(),
            symptom.name,
            symptom.icon,
            symptom.is_default as i32,
        ],
    )?;
    Ok(())
}

/// Seeds the default symptom catalogue for a user. Existing names are kept.
/// Returns the full symptom list afterwards.
pub fn seed_default_symptoms(conn: &Connection, user_id: &Uuid) -> Result<Vec<Symptom>, DatabaseError> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO symptoms (id, user_id, name, icon, is_default)
         VALUES (?1, ?2, ?3, ?4, 1)",
    )?;
    for (name, icon) in DEFAULT_SYMPTOMS {
        stmt.execute(params![
            Uuid::new_v4().to_string(),
            user_id.to_string(),
            name,
            icon
        ])?;
    }
    list_symptoms(conn, user_id)
}

pub fn list_symptoms(conn: &Connection, user_id: &Uuid) -> Result<Vec<Symptom>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, icon, is_default
         FROM symptoms WHERE user_id = ?1
         ORDER BY is_default DESC, name ASC",
    )?;

    let rows = stmt.query_map(params![user_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i32>(4)?,
        ))
    })?;

    let mut symptoms = Vec::new();
    for row in rows {
        let (id, user_id, name, icon, is_default) = row?;
        symptoms.push(Symptom {
            id: parse_uuid("symptoms.id", &id)?,
            user_id: parse_uuid("symptoms.user_id", &user_id)?,
            name,
            icon,
            is_default: is_default != 0,
        });
    }
    Ok(symptoms)
}

pub fn find_symptom_by_name(
    conn: &Connection,
    user_id: &Uuid,
    name: &str,
) -> Result<Option<Uuid>, DatabaseError> {
    let id: Option<String> = conn
        .query_row(
            "SELECT id FROM symptoms WHERE user_id = ?1 AND name = ?2",
            params![user_id.to_string(), name],
            |row| row.get(0),
        )
        .optional()?;
    id.map(|s| parse_uuid("symptoms.id", &s)).transpose()
}

// ═══════════════════════════════════════════
// Symptom logs
// ═══════════════════════════════════════════

pub fn insert_symptom_log(conn: &Connection, log: &SymptomLog) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptom_logs (id, user_id, symptom_id, severity, triggers, notes, logged_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.user_id.to_string(),
            log.symptom_id.to_string(),
            log.severity.level(),
            encode_tags(&log.triggers),
            log.notes,
            format_timestamp(&log.logged_at),
        ],
    )?;
    Ok(())
}

type SymptomLogRow = (
    String, String, String, Option<String>, Value, String, Option<String>, String,
);

/// Fetches a user's symptom logs with `start <= logged_at <= end`, joined with
/// symptom names. Rows are returned newest first.
pub fn fetch_symptom_logs(
    conn: &Connection,
    user_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<SymptomLog>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.user_id, l.symptom_id, s.name, l.severity, l.triggers, l.notes, l.logged_at
         FROM symptom_logs l
         LEFT JOIN symptoms s ON s.id = l.symptom_id
         WHERE l.user_id = ?1 AND l.logged_at >= ?2 AND l.logged_at <= ?3
         ORDER BY l.logged_at DESC, l.id ASC",
    )?;

    let (lower, upper) = padded_bounds(start, end);
    let rows = stmt.query_map(
        params![user_id.to_string(), lower, upper],
        |row| -> rusqlite::Result<SymptomLogRow> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
            ))
        },
    )?;

    let mut logs = Vec::new();
    for row in rows {
        let (id, user_id, symptom_id, symptom_name, severity, triggers, notes, logged_at) = row?;
        let logged_at = parse_timestamp("symptom_logs.logged_at", &logged_at)?;
        if !in_range(&logged_at, start, end) {
            continue;
        }
        logs.push(SymptomLog {
            id: parse_uuid("symptom_logs.id", &id)?,
            user_id: parse_uuid("symptom_logs.user_id", &user_id)?,
            symptom_id: parse_uuid("symptom_logs.symptom_id", &symptom_id)?,
            symptom_name,
            severity: Severity::from_level(integer_value("symptom_logs.severity", severity)?)?,
            triggers: decode_tags("symptom_logs.triggers", &triggers)?,
            notes,
            logged_at,
        });
    }
    logs.sort_by(|a, b| b.logged_at.cmp(&a.logged_at).then_with(|| a.id.cmp(&b.id)));
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn test_db() -> Connection {
        open_memory_database().expect("in-memory DB")
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    fn make_log(user: Uuid, symptom: Uuid, severity: Severity, when: DateTime<Utc>) -> SymptomLog {
        SymptomLog {
            id: Uuid::new_v4(),
            user_id: user,
            symptom_id: symptom,
            symptom_name: None,
            severity,
            triggers: BTreeSet::from(["Stress".to_string()]),
            notes: None,
            logged_at: when,
        }
    }

    #[test]
    fn seed_defaults_is_idempotent() {
        let conn = test_db();
        let user = Uuid::new_v4();
        let first = seed_default_symptoms(&conn, &user).unwrap();
        let second = seed_default_symptoms(&conn, &user).unwrap();
        assert_eq!(first.len(), 12);
        assert_eq!(second.len(), 12);
        assert!(first.iter().all(|s| s.is_default));
    }

    #[test]
    fn find_symptom_by_name_scoped_to_user() {
        let conn = test_db();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        seed_default_symptoms(&conn, &alice).unwrap();
        assert!(find_symptom_by_name(&conn, &alice, "Hot flashes").unwrap().is_some());
        assert!(find_symptom_by_name(&conn, &bob, "Hot flashes").unwrap().is_none());
    }

    #[test]
    fn fetch_logs_joins_names_and_bounds_window() {
        let conn = test_db();
        let user = Uuid::new_v4();
        seed_default_symptoms(&conn, &user).unwrap();
        let hot = find_symptom_by_name(&conn, &user, "Hot flashes").unwrap().unwrap();

        insert_symptom_log(&conn, &make_log(user, hot, Severity::Severe, at(2, 9))).unwrap();
        insert_symptom_log(&conn, &make_log(user, hot, Severity::Mild, at(10, 9))).unwrap();
        insert_symptom_log(&conn, &make_log(user, hot, Severity::Mild, at(25, 9))).unwrap();

        let logs = fetch_symptom_logs(&conn, &user, &at(1, 0), &at(20, 0)).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].logged_at, at(10, 9));
        assert_eq!(logs[0].symptom_name.as_deref(), Some("Hot flashes"));
        assert!(logs[0].triggers.contains("Stress"));
    }

    #[test]
    fn fetch_logs_orphaned_symptom_has_no_name() {
        let conn = test_db();
        let user = Uuid::new_v4();
        insert_symptom_log(&conn, &make_log(user, Uuid::new_v4(), Severity::Moderate, at(3, 9)))
            .unwrap();

        let logs = fetch_symptom_logs(&conn, &user, &at(1, 0), &at(31, 0)).unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].symptom_name.is_none());
        assert_eq!(logs[0].display_name(), "Unknown");
    }

    #[test]
    fn fetch_logs_rejects_out_of_range_severity() {
        let conn = test_db();
        let user = Uuid::new_v4();
        conn.execute(
            "INSERT INTO symptom_logs (id, user_id, symptom_id, severity, logged_at)
             VALUES (?1, ?2, ?3, 7, '2026-01-05T08:00:00Z')",
            params![Uuid::new_v4().to_string(), user.to_string(), Uuid::new_v4().to_string()],
        )
        .unwrap();

        let err = fetch_symptom_logs(&conn, &user, &at(1, 0), &at(31, 0)).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidValue { .. }));
    }

    #[test]
    fn fetch_logs_rejects_non_numeric_severity() {
        let conn = test_db();
        let user = Uuid::new_v4();
        conn.execute(
            "INSERT INTO symptom_logs (id, user_id, symptom_id, severity, logged_at)
             VALUES (?1, ?2, ?3, 'very bad', '2026-01-05T08:00:00Z')",
            params![Uuid::new_v4().to_string(), user.to_string(), Uuid::new_v4().to_string()],
        )
        .unwrap();

        let err = fetch_symptom_logs(&conn, &user, &at(1, 0), &at(31, 0)).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidValue { ref field, .. } if field == "symptom_logs.severity"));
    }

    #[test]
    fn fetch_logs_bounds_offset_timestamps_by_instant() {
        let conn = test_db();
        let user = Uuid::new_v4();
        let insert = |logged_at: &str| {
            conn.execute(
                "INSERT INTO symptom_logs (id, user_id, symptom_id, severity, logged_at)
                 VALUES (?1, ?2, ?3, 2, ?4)",
                params![Uuid::new_v4().to_string(), user.to_string(), Uuid::new_v4().to_string(), logged_at],
            )
            .unwrap();
        };
        // 2026-01-11T03:00Z: after the window although its local date is inside.
        insert("2026-01-10T22:00:00-05:00");
        // 2026-01-10T23:00Z: inside the window although its local date is after.
        insert("2026-01-11T08:00:00+09:00");
        // 2025-12-31T23:30Z: before the window.
        insert("2026-01-01T00:30:00+01:00");

        let end = Utc.with_ymd_and_hms(2026, 1, 10, 23, 59, 59).unwrap();
        let logs = fetch_symptom_logs(&conn, &user, &at(1, 0), &end).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].logged_at, Utc.with_ymd_and_hms(2026, 1, 10, 23, 0, 0).unwrap());
    }

    #[test]
    fn fetch_logs_empty_for_other_user() {
        let conn = test_db();
        let user = Uuid::new_v4();
        insert_symptom_log(&conn, &make_log(user, Uuid::new_v4(), Severity::Mild, at(3, 9))).unwrap();
        let logs = fetch_symptom_logs(&conn, &Uuid::new_v4(), &at(1, 0), &at(31, 0)).unwrap();
        assert!(logs.is_empty());
    }
}
