use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

use tinig_sky::DayBoundary;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    /// Without a key every day gets the fallback quote.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub day_boundary: DayBoundary,
    pub ambient: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = get("TINIG_HOST", "0.0.0.0");
        let port: u16 = get("TINIG_PORT", "3000")
            .parse()
            .context("TINIG_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let day_boundary = get("TINIG_QUOTE_TZ", "utc")
            .parse::<DayBoundary>()
            .map_err(anyhow::Error::msg)?;

        let ambient = match get("TINIG_AMBIENT", "on").to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => true,
            "off" | "false" | "0" => false,
            other => bail!("TINIG_AMBIENT must be on or off, got '{}'", other),
        };

        Ok(Self {
            addr,
            db_path: PathBuf::from(get("TINIG_DB_PATH", "tinig.db")),
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_model: get("TINIG_GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_url: get("TINIG_GEMINI_URL", DEFAULT_GEMINI_URL),
            day_boundary,
            ambient,
        })
    }
}
