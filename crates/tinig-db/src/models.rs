//! Database row types. These map directly to SQLite rows and stay
//! independent of the tinig-types wire models.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use tinig_types::models::{DailyQuote, Star};

#[derive(Debug, Clone)]
pub struct StarRow {
    pub id: String,
    pub content: String,
    pub pos_x: i64,
    pub pos_y: i64,
    pub likes: i64,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct QuoteRow {
    pub date: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

/// Parse a stored timestamp. Rows written by this crate are RFC 3339;
/// rows inserted by hand through `datetime('now')` are naive UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .with_context(|| format!("invalid timestamp '{}'", raw))
}

impl TryFrom<StarRow> for Star {
    type Error = anyhow::Error;

    fn try_from(row: StarRow) -> Result<Self> {
        let created_at = parse_timestamp(&row.created_at)
            .with_context(|| format!("star '{}'", row.id))?;

        Ok(Star {
            pos_x: u8::try_from(row.pos_x).context("pos_x out of range")?,
            pos_y: u8::try_from(row.pos_y).context("pos_y out of range")?,
            likes: u64::try_from(row.likes).context("negative likes")?,
            id: row.id,
            content: row.content,
            created_at,
        })
    }
}

impl TryFrom<QuoteRow> for DailyQuote {
    type Error = anyhow::Error;

    fn try_from(row: QuoteRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .with_context(|| format!("invalid quote date '{}'", row.date))?;

        Ok(DailyQuote {
            date,
            content: row.content,
            author: row.author,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_timestamp_shapes() {
        let rfc = parse_timestamp("2026-10-14T18:30:00.250Z").unwrap();
        let naive = parse_timestamp("2026-10-14 18:30:00").unwrap();
        assert_eq!(rfc.timestamp(), naive.timestamp());
        assert!(parse_timestamp("yesterday-ish").is_err());
    }

    #[test]
    fn malformed_star_row_is_rejected() {
        let row = StarRow {
            id: "s1".into(),
            content: "hello".into(),
            pos_x: 20,
            pos_y: 30,
            likes: 0,
            created_at: "not a time".into(),
        };
        assert!(Star::try_from(row).is_err());
    }
}
