use crate::Database;
use crate::models::{QuoteRow, StarRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

const STAR_COLUMNS: &str = "id, content, pos_x, pos_y, likes, created_at";

impl Database {
    // -- Stars --

    /// Insert a star and return the stored row, including the generated
    /// `created_at` and the zero like count.
    pub fn insert_star(&self, id: &str, content: &str, pos_x: u8, pos_y: u8) -> Result<StarRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO stars (id, content, pos_x, pos_y) VALUES (?1, ?2, ?3, ?4)
                     RETURNING {STAR_COLUMNS}"
                ),
                rusqlite::params![id, content, pos_x, pos_y],
                star_from_row,
            )?;
            Ok(row)
        })
    }

    /// Most recent stars first.
    pub fn recent_stars(&self, limit: u32) -> Result<Vec<StarRow>> {
        self.with_conn(|conn| query_recent_stars(conn, limit))
    }

    pub fn get_star(&self, id: &str) -> Result<Option<StarRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {STAR_COLUMNS} FROM stars WHERE id = ?1"),
                    [id],
                    star_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Atomically add one like. The read and the write happen in a single
    /// statement, so concurrent callers never lose an update.
    /// Returns the new count, or `None` if the star does not exist.
    pub fn increment_likes(&self, id: &str) -> Result<Option<u64>> {
        self.with_conn_mut(|conn| {
            let likes: Option<i64> = conn
                .query_row(
                    "UPDATE stars SET likes = likes + 1 WHERE id = ?1 RETURNING likes",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(likes.map(|n| n.max(0) as u64))
        })
    }

    // -- Daily quotes --

    pub fn quote_by_date(&self, date: &str) -> Result<Option<QuoteRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT date, content, author, created_at FROM daily_quotes WHERE date = ?1",
                    [date],
                    |row| {
                        Ok(QuoteRow {
                            date: row.get(0)?,
                            content: row.get(1)?,
                            author: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Store the quote for `date` unless one already exists.
    /// Returns `true` if this call wrote the row.
    pub fn insert_quote(&self, date: &str, content: &str, author: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "INSERT INTO daily_quotes (date, content, author) VALUES (?1, ?2, ?3)
                 ON CONFLICT(date) DO NOTHING",
                (date, content, author),
            )?;
            Ok(changed == 1)
        })
    }
}

fn query_recent_stars(conn: &Connection, limit: u32) -> Result<Vec<StarRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STAR_COLUMNS} FROM stars ORDER BY created_at DESC LIMIT ?1"
    ))?;

    let rows = stmt
        .query_map([limit], star_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn star_from_row(row: &Row<'_>) -> rusqlite::Result<StarRow> {
    Ok(StarRow {
        id: row.get(0)?,
        content: row.get(1)?,
        pos_x: row.get(2)?,
        pos_y: row.get(3)?,
        likes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use uuid::Uuid;

    use super::*;

    fn insert_at(db: &Database, id: &str, created_at: &str) {
        db.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO stars (id, content, pos_x, pos_y, created_at) VALUES (?1, 'hi', 50, 50, ?2)",
                (id, created_at),
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn insert_returns_generated_fields() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4().to_string();

        let row = db.insert_star(&id, "para sa iyo", 12, 88).unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.likes, 0);
        assert_eq!((row.pos_x, row.pos_y), (12, 88));
        assert!(crate::models::parse_timestamp(&row.created_at).is_ok());
    }

    #[test]
    fn recent_stars_newest_first_and_limited() {
        let db = Database::open_in_memory().unwrap();
        insert_at(&db, "old", "2026-10-10T01:00:00.000Z");
        insert_at(&db, "newest", "2026-10-12T01:00:00.000Z");
        insert_at(&db, "middle", "2026-10-11T01:00:00.000Z");

        let ids: Vec<String> = db.recent_stars(2).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["newest", "middle"]);
    }

    #[test]
    fn content_over_280_chars_is_refused_by_the_store() {
        let db = Database::open_in_memory().unwrap();
        let long = "ñ".repeat(281);
        assert!(db.insert_star("x", &long, 10, 10).is_err());
        assert!(db.insert_star("y", &"ñ".repeat(280), 10, 10).is_ok());
    }

    #[test]
    fn increment_unknown_star_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.increment_likes("missing").unwrap(), None);
    }

    #[test]
    fn concurrent_likes_are_not_lost() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.insert_star("s", "hello", 40, 40).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        db.increment_likes("s").unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let row = db.get_star("s").unwrap().unwrap();
        assert_eq!(row.likes, 200);
    }

    #[test]
    fn one_quote_per_date() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_quote("2026-10-14", "first", "Kalawakan").unwrap());
        assert!(!db.insert_quote("2026-10-14", "second", "Kalawakan").unwrap());

        let row = db.quote_by_date("2026-10-14").unwrap().unwrap();
        assert_eq!(row.content, "first");
        assert!(db.quote_by_date("2026-10-15").unwrap().is_none());
    }
}
