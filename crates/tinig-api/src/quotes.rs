use anyhow::{Context, Result, bail};
use axum::{Json, extract::State};
use tracing::{error, info};

use tinig_types::api::QuoteResponse;

use crate::state::{AppState, with_db};

/// Author label of every generated quote.
pub const AUTHOR: &str = "Kalawakan";

pub const FALLBACK_CONTENT: &str = "Ang katahimikan ay sagot din.";

pub const QUOTE_PROMPT: &str = "Generate a short, deep, and poetic quote about life, the universe, stars, or emotions.
It can be in Tagalog or English.
Maximum of 20 words.
Make it sound like a whisper from the void.
Do not include quotation marks.
Just the text.";

pub fn fallback() -> QuoteResponse {
    QuoteResponse {
        content: FALLBACK_CONTENT.to_string(),
        author: AUTHOR.to_string(),
    }
}

/// GET /api/daily-quote: always 200. Failures are logged and answered
/// with the fallback quote.
pub async fn daily_quote(State(state): State<AppState>) -> Json<QuoteResponse> {
    match quote_for_today(&state).await {
        Ok(quote) => Json(quote),
        Err(e) => {
            error!("Daily quote error: {:#}", e);
            Json(fallback())
        }
    }
}

/// Return today's stored quote, generating and storing it on the first
/// request of the day.
///
/// No lock is taken: two first-of-day requests may both generate, but the
/// store keeps only the first insert and both return that row.
pub async fn quote_for_today(state: &AppState) -> Result<QuoteResponse> {
    let today = state
        .day_boundary
        .today(state.clock.as_ref())
        .format("%Y-%m-%d")
        .to_string();

    let date = today.clone();
    if let Some(row) = with_db(state, move |db| db.quote_by_date(&date)).await? {
        return Ok(QuoteResponse {
            content: row.content,
            author: row.author,
        });
    }

    let text = state
        .generator
        .generate(QUOTE_PROMPT)
        .await
        .context("generating quote")?
        .trim()
        .to_string();
    if text.is_empty() {
        bail!("generator returned only whitespace");
    }

    let date = today.clone();
    let (inserted, row) = with_db(state, move |db| {
        let inserted = db.insert_quote(&date, &text, AUTHOR)?;
        Ok((inserted, db.quote_by_date(&date)?))
    })
    .await?;

    let row = row.with_context(|| format!("quote for {} missing after insert", today))?;
    if inserted {
        info!("Stored daily quote for {}", today);
    }

    Ok(QuoteResponse {
        content: row.content,
        author: row.author,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::generator::GeneratorError;
    use crate::state::testing::{ScriptedGenerator, at, harness};

    fn stored_quotes(state: &AppState) -> i64 {
        state
            .db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM daily_quotes", [], |r| r.get(0))?))
            .unwrap()
    }

    #[tokio::test]
    async fn same_day_is_idempotent() {
        let h = harness(at(2026, 10, 14, 8, 0), ScriptedGenerator::numbered());

        let Json(first) = daily_quote(State(h.state.clone())).await;
        let Json(second) = daily_quote(State(h.state.clone())).await;

        assert_eq!(first, second);
        assert_eq!(first.content, "Bulong bilang 1");
        assert_eq!(first.author, AUTHOR);
        assert_eq!(h.generator.calls(), 1);
    }

    #[tokio::test]
    async fn new_day_generates_exactly_once() {
        let h = harness(at(2026, 10, 14, 23, 0), ScriptedGenerator::numbered());
        let Json(yesterday) = daily_quote(State(h.state.clone())).await;

        h.clock.set(at(2026, 10, 15, 0, 5));
        let Json(q) = daily_quote(State(h.state.clone())).await;
        let Json(again) = daily_quote(State(h.state.clone())).await;

        assert_eq!(yesterday.content, "Bulong bilang 1");
        assert_eq!(q.content, "Bulong bilang 2");
        assert_eq!(again, q);
        assert_eq!(h.generator.calls(), 2);
        assert_eq!(stored_quotes(&h.state), 2);
    }

    #[tokio::test]
    async fn generator_failure_falls_back_without_storing() {
        let generator = ScriptedGenerator::replying(vec![Err(GeneratorError::NotConfigured)]);
        let h = harness(at(2026, 10, 14, 8, 0), generator);

        let Json(q) = daily_quote(State(h.state.clone())).await;
        assert_eq!(q, fallback());
        assert_eq!(stored_quotes(&h.state), 0);

        // Next request tries again
        let Json(q) = daily_quote(State(h.state.clone())).await;
        assert_eq!(q.content, "Bulong bilang 2");
    }

    #[tokio::test]
    async fn blank_generation_falls_back() {
        let generator = ScriptedGenerator::replying(vec![Ok("   \n".into())]);
        let h = harness(at(2026, 10, 14, 8, 0), generator);

        let Json(q) = daily_quote(State(h.state.clone())).await;
        assert_eq!(q, fallback());
        assert_eq!(stored_quotes(&h.state), 0);
    }

    #[tokio::test]
    async fn store_failure_falls_back() {
        let h = harness(at(2026, 10, 14, 8, 0), ScriptedGenerator::numbered());
        h.state
            .db
            .with_conn(|conn| Ok(conn.execute_batch("DROP TABLE daily_quotes")?))
            .unwrap();

        let Json(q) = daily_quote(State(h.state.clone())).await;
        assert_eq!(q, fallback());
    }

    #[tokio::test]
    async fn racing_first_requests_agree() {
        let generator = ScriptedGenerator::numbered().with_delay(Duration::from_millis(50));
        let h = harness(at(2026, 10, 14, 8, 0), generator);

        let (a, b) = tokio::join!(quote_for_today(&h.state), quote_for_today(&h.state));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a, b);
        assert_eq!(h.generator.calls(), 2);
        assert_eq!(stored_quotes(&h.state), 1);
    }

    #[tokio::test]
    async fn generated_text_is_trimmed() {
        let generator = ScriptedGenerator::replying(vec![Ok("\n  Ikaw ay alikabok ng bituin.  \n".into())]);
        let h = harness(at(2026, 10, 14, 8, 0), generator);

        let q = quote_for_today(&h.state).await.unwrap();
        assert_eq!(q.content, "Ikaw ay alikabok ng bituin.");
    }
}
