//! SQLite repository implementation
//!
//! Stateless statements over a borrowed connection. Callers decide the
//! connection's lifetime; nothing here opens a transaction.

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_row, from_rusqlite, Result};
use chrono::{DateTime, NaiveDate, Utc};
use crossbot_core::model::{ActivityKind, CompletionRecord, SavedQuery};
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite repository for saved queries and completions
pub struct SqliteRepo;

impl SqliteRepo {
    /// Create or replace a saved query
    ///
    /// A single upsert statement, so concurrent saves under the same name are
    /// last-write-wins and readers never observe a missing row.
    pub fn persist_query(conn: &Connection, query: &SavedQuery) -> Result<()> {
        conn.execute(
            "INSERT INTO query_shorthands (name, command, userid, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
                command = excluded.command,
                userid = excluded.userid,
                created_at = excluded.created_at",
            rusqlite::params![
                query.name,
                query.template,
                query.owner_id,
                query.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Get a saved query by name
    pub fn get_query(conn: &Connection, name: &str) -> Result<Option<SavedQuery>> {
        conn.query_row(
            "SELECT name, command, userid, created_at FROM query_shorthands WHERE name = ?",
            [name],
            query_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All saved queries, oldest name first
    ///
    /// An upsert keeps the original rowid, so replacing a query does not move
    /// it in the listing.
    pub fn list_queries(conn: &Connection) -> Result<Vec<SavedQuery>> {
        let mut stmt = conn
            .prepare("SELECT name, command, userid, created_at FROM query_shorthands ORDER BY rowid")
            .map_err(from_rusqlite)?;

        let queries = stmt
            .query_map([], query_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(queries)
    }

    /// Record a completion; an existing (user, kind, date) row is left alone
    pub fn persist_completion(conn: &Connection, record: &CompletionRecord) -> Result<()> {
        conn.execute(
            "INSERT INTO completions (userid, kind, date) VALUES (?1, ?2, ?3)
             ON CONFLICT(userid, kind, date) DO NOTHING",
            rusqlite::params![
                record.user_id,
                record.kind.as_str(),
                record.date.format(DATE_FORMAT).to_string(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Dates on which a user completed a puzzle of the given kind
    pub fn completed_dates(
        conn: &Connection,
        user_id: &str,
        kind: ActivityKind,
    ) -> Result<BTreeSet<NaiveDate>> {
        let mut stmt = conn
            .prepare("SELECT date FROM completions WHERE userid = ?1 AND kind = ?2")
            .map_err(from_rusqlite)?;

        let raw = stmt
            .query_map(rusqlite::params![user_id, kind.as_str()], |row| {
                row.get::<_, String>(0)
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        raw.iter()
            .map(|s| {
                NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .map_err(|e| corrupt_row("completions", &format!("bad date '{}': {}", s, e)))
            })
            .collect()
    }
}

fn query_from_row(row: &Row<'_>) -> rusqlite::Result<SavedQuery> {
    let created_at: i64 = row.get(3)?;
    Ok(SavedQuery {
        name: row.get(0)?,
        template: row.get(1)?,
        owner_id: row.get(2)?,
        created_at: DateTime::<Utc>::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_get_missing_query_is_none() {
        let conn = setup();
        assert_eq!(SqliteRepo::get_query(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn test_replace_keeps_listing_position() {
        let conn = setup();
        let at = DateTime::<Utc>::from_timestamp(1_514_764_800, 0).unwrap();
        SqliteRepo::persist_query(&conn, &SavedQuery::new("a", "SELECT 1", "U1", at)).unwrap();
        SqliteRepo::persist_query(&conn, &SavedQuery::new("b", "SELECT 2", "U1", at)).unwrap();
        SqliteRepo::persist_query(&conn, &SavedQuery::new("a", "SELECT 3", "U2", at)).unwrap();

        let names: Vec<_> = SqliteRepo::list_queries(&conn)
            .unwrap()
            .into_iter()
            .map(|q| (q.name, q.template))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), "SELECT 3".to_string()),
                ("b".to_string(), "SELECT 2".to_string())
            ]
        );
    }

    #[test]
    fn test_completion_insert_is_idempotent() {
        let conn = setup();
        let day = NaiveDate::from_ymd_opt(2018, 1, 2).unwrap();
        let record = CompletionRecord::new("U1", ActivityKind::Mini, day);
        SqliteRepo::persist_completion(&conn, &record).unwrap();
        SqliteRepo::persist_completion(&conn, &record).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
