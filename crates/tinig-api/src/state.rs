use std::sync::Arc;

use anyhow::anyhow;

use tinig_db::Database;
use tinig_gateway::dispatcher::Dispatcher;
use tinig_sky::{Clock, ContentPolicy, DayBoundary};

use crate::generator::TextGenerator;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub dispatcher: Dispatcher,
    pub generator: Arc<dyn TextGenerator>,
    pub policy: Arc<dyn ContentPolicy>,
    pub clock: Arc<dyn Clock>,
    pub day_boundary: DayBoundary,
}

/// Run a blocking store call off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?
}
