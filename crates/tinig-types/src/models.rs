use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A message released into the night sky.
///
/// Positions are percentages of the viewport. `created_at` drives the
/// star's fade-out; the row itself is never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: String,
    pub content: String,
    pub pos_x: u8,
    pub pos_y: u8,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

/// One generated quote per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub content: String,
    pub author: String,
}
