//! Nutrition, hydration and fitness entries.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{
    decode_tags, encode_tags, format_timestamp, in_range, integer_value, non_negative, padded_bounds,
    parse_timestamp, parse_uuid,
};
use crate::db::DatabaseError;
use crate::models::enums::{Intensity, MealType};
use crate::models::{FitnessEntry, HydrationEntry, NutritionEntry};

fn optional_count(field: &str, value: Value) -> Result<Option<u32>, DatabaseError> {
    match value {
        Value::Null => Ok(None),
        other => non_negative(field, integer_value(field, other)?).map(Some),
    }
}

// ═══════════════════════════════════════════
// Nutrition
// ═══════════════════════════════════════════

pub fn insert_nutrition_entry(conn: &Connection, entry: &NutritionEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO nutrition (id, user_id, food_item, meal_type, calories, food_tags, notes, consumed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id.to_string(),
            entry.user_id.to_string(),
            entry.food_item,
            entry.meal_type.as_str(),
            entry.calories,
            encode_tags(&entry.food_tags),
            entry.notes,
            format_timestamp(&entry.consumed_at),
        ],
    )?;
    Ok(())
}

type NutritionRow = (String, String, String, String, Value, String, Option<String>, String);

pub fn fetch_nutrition_entries(
    conn: &Connection,
    user_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<NutritionEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, food_item, meal_type, calories, food_tags, notes, consumed_at
         FROM nutrition
         WHERE user_id = ?1 AND consumed_at >= ?2 AND consumed_at <= ?3
         ORDER BY consumed_at DESC, id ASC",
    )?;

    let (lower, upper) = padded_bounds(start, end);
    let rows = stmt.query_map(
        params![user_id.to_string(), lower, upper],
        |row| -> rusqlite::Result<NutritionRow> {
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

    let mut entries = Vec::new();
    for row in rows {
        let (id, user_id, food_item, meal_type, calories, food_tags, notes, consumed_at) = row?;
        let consumed_at = parse_timestamp("nutrition.consumed_at", &consumed_at)?;
        if !in_range(&consumed_at, start, end) {
            continue;
        }
        entries.push(NutritionEntry {
            id: parse_uuid("nutrition.id", &id)?,
            user_id: parse_uuid("nutrition.user_id", &user_id)?,
            food_item,
            meal_type: MealType::from_str(&meal_type)?,
            calories: optional_count("nutrition.calories", calories)?,
            food_tags: decode_tags("nutrition.food_tags", &food_tags)?,
            notes,
            consumed_at,
        });
    }
    Ok(entries)
}

// ═══════════════════════════════════════════
// Hydration
// ═══════════════════════════════════════════

pub fn insert_hydration_entry(conn: &Connection, entry: &HydrationEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO hydration (id, user_id, glasses, logged_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.id.to_string(),
            entry.user_id.to_string(),
            entry.glasses,
            format_timestamp(&entry.logged_at),
        ],
    )?;
    Ok(())
}

pub fn fetch_hydration_entries(
    conn: &Connection,
    user_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<HydrationEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, glasses, logged_at FROM hydration
         WHERE user_id = ?1 AND logged_at >= ?2 AND logged_at <= ?3
         ORDER BY logged_at DESC, id ASC",
    )?;

    let (lower, upper) = padded_bounds(start, end);
    let rows = stmt.query_map(
        params![user_id.to_string(), lower, upper],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Value>(2)?,
                row.get::<_, String>(3)?,
            ))
        },
    )?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, user_id, glasses, logged_at) = row?;
        let logged_at = parse_timestamp("hydration.logged_at", &logged_at)?;
        if !in_range(&logged_at, start, end) {
            continue;
        }
        entries.push(HydrationEntry {
            id: parse_uuid("hydration.id", &id)?,
            user_id: parse_uuid("hydration.user_id", &user_id)?,
            glasses: non_negative("hydration.glasses", integer_value("hydration.glasses", glasses)?)?,
            logged_at,
        });
    }
    Ok(entries)
}

// ═══════════════════════════════════════════
// Fitness
// ═══════════════════════════════════════════

pub fn insert_fitness_entry(conn: &Connection, entry: &FitnessEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO fitness (id, user_id, exercise_name, exercise_type, duration_minutes,
            calories_burned, intensity, notes, performed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.id.to_string(),
            entry.user_id.to_string(),
            entry.exercise_name,
            entry.exercise_type,
            entry.duration_minutes,
            entry.calories_burned,
            entry.intensity.map(|i| i.as_str()),
            entry.notes,
            format_timestamp(&entry.performed_at),
        ],
    )?;
    Ok(())
}

type FitnessRow = (
    String, String, String, String, Value, Value, Option<String>, Option<String>, String,
);

pub fn fetch_fitness_entries(
    conn: &Connection,
    user_id: &Uuid,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<FitnessEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, exercise_name, exercise_type, duration_minutes, calories_burned,
                intensity, notes, performed_at
         FROM fitness
         WHERE user_id = ?1 AND performed_at >= ?2 AND performed_at <= ?3
         ORDER BY performed_at DESC, id ASC",
    )?;

    let (lower, upper) = padded_bounds(start, end);
    let rows = stmt.query_map(
        params![user_id.to_string(), lower, upper],
        |row| -> rusqlite::Result<FitnessRow> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ))
        },
    )?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, user_id, name, kind, duration, burned, intensity, notes, performed_at) = row?;
        let performed_at = parse_timestamp("fitness.performed_at", &performed_at)?;
        if !in_range(&performed_at, start, end) {
            continue;
        }
        entries.push(FitnessEntry {
            id: parse_uuid("fitness.id", &id)?,
            user_id: parse_uuid("fitness.user_id", &user_id)?,
            exercise_name: name,
            exercise_type: kind,
            duration_minutes: optional_count("fitness.duration_minutes", duration)?,
            calories_burned: optional_count("fitness.calories_burned", burned)?,
            intensity: intensity.as_deref().map(Intensity::from_str).transpose()?,
            notes,
            performed_at,
        });
    }
    Ok(entries)
}
