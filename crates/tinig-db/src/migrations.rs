use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (stars, daily_quotes)");
        conn.execute_batch(
            "
            CREATE TABLE stars (
                id          TEXT PRIMARY KEY,
                content     TEXT NOT NULL CHECK (length(content) BETWEEN 1 AND 280),
                pos_x       INTEGER NOT NULL,
                pos_y       INTEGER NOT NULL,
                likes       INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX idx_stars_created ON stars(created_at);

            CREATE TABLE daily_quotes (
                date        TEXT NOT NULL UNIQUE,
                content     TEXT NOT NULL,
                author      TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
