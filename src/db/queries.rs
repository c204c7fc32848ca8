use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::StoreError;
use crate::models::AuditRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Trips ──

/// Single-statement insert: the row is either fully written or absent.
pub fn insert_trip(
    conn: &Connection,
    id: &str,
    caller_identity: &str,
    raw_text: &str,
    intent: &serde_json::Value,
    extraction_policy: Option<&str>,
) -> Result<AuditRecord, StoreError> {
    let intent_json = serde_json::to_string(intent)?;

    let row = conn.query_row(
        "INSERT INTO trips (id, caller_identity, raw_text, intent, extraction_policy)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id, created_at, caller_identity, raw_text, intent, extraction_policy",
        params![id, caller_identity, raw_text, intent_json, extraction_policy],
        read_trip_columns,
    )?;

    parse_trip_row(row)
}

pub fn get_trip(conn: &Connection, id: &str) -> Result<Option<AuditRecord>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, created_at, caller_identity, raw_text, intent, extraction_policy
             FROM trips WHERE id = ?1",
            params![id],
            read_trip_columns,
        )
        .optional()?;

    row.map(parse_trip_row).transpose()
}

pub fn list_trips(conn: &Connection, limit: i64) -> Result<Vec<AuditRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, created_at, caller_identity, raw_text, intent, extraction_policy
         FROM trips ORDER BY created_at DESC, rowid DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], read_trip_columns)?;

    let mut trips = vec![];
    for row in rows {
        trips.push(parse_trip_row(row?)?);
    }
    Ok(trips)
}

pub fn ping(conn: &Connection) -> Result<(), StoreError> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

type TripColumns = (String, String, String, String, String, Option<String>);

fn read_trip_columns(row: &rusqlite::Row) -> rusqlite::Result<TripColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn parse_trip_row(
    (id, created_at_str, caller_identity, raw_text, intent_json, extraction_policy): TripColumns,
) -> Result<AuditRecord, StoreError> {
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("trip {id} created_at {created_at_str:?}: {e}")))?;
    let intent = serde_json::from_str(&intent_json)
        .map_err(|e| StoreError::Corrupt(format!("trip {id} intent: {e}")))?;

    Ok(AuditRecord {
        id,
        created_at,
        caller_identity,
        raw_text,
        intent,
        extraction_policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use serde_json::json;

    #[test]
    fn test_insert_and_get_trip() {
        let conn = db::init_db(":memory:").unwrap();
        let intent = json!({"destination_cities": ["Rome"], "num_travelers": 1});

        let saved = insert_trip(
            &conn,
            "trip-1",
            "anon@example.com",
            "Dallas to Rome",
            &intent,
            Some("policy-7"),
        )
        .unwrap();
        assert_eq!(saved.id, "trip-1");
        assert_eq!(saved.caller_identity, "anon@example.com");
        assert_eq!(saved.raw_text, "Dallas to Rome");
        assert_eq!(saved.intent, intent);
        assert_eq!(saved.extraction_policy.as_deref(), Some("policy-7"));

        let loaded = get_trip(&conn, "trip-1").unwrap().unwrap();
        assert_eq!(loaded, saved);

        assert!(get_trip(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_id_writes_nothing() {
        let conn = db::init_db(":memory:").unwrap();
        insert_trip(&conn, "dup", "a", "first", &json!({}), None).unwrap();
        assert!(insert_trip(&conn, "dup", "b", "second", &json!({}), None).is_err());

        let trips = list_trips(&conn, 10).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].raw_text, "first");
    }

    #[test]
    fn test_list_trips_newest_first() {
        let conn = db::init_db(":memory:").unwrap();
        for i in 0..3 {
            insert_trip(&conn, &format!("t{i}"), "anon", &format!("trip {i}"), &json!({}), None).unwrap();
        }
        conn.execute(
            "UPDATE trips SET created_at = '2020-01-01 00:00:00' WHERE id = 't2'",
            [],
        )
        .unwrap();

        let trips = list_trips(&conn, 10).unwrap();
        let ids: Vec<&str> = trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t0", "t2"]);

        assert_eq!(list_trips(&conn, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO trips (id, caller_identity, raw_text, intent) VALUES ('bad', 'a', 'b', 'not json')",
            [],
        )
        .unwrap();
        assert!(matches!(get_trip(&conn, "bad"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_ping() {
        let conn = db::init_db(":memory:").unwrap();
        assert!(ping(&conn).is_ok());
    }
}
