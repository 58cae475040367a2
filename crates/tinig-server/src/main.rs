mod config;

use std::sync::Arc;

use tracing::{info, warn};

use tinig_api::generator::{GeminiGenerator, TextGenerator, Unconfigured};
use tinig_api::{AppState, AppStateInner, router};
use tinig_gateway::ambient::{Ambient, AmbientConfig};
use tinig_gateway::dispatcher::Dispatcher;
use tinig_sky::{Clock, Denylist, SystemClock};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinig=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = tinig_db::Database::open(&config.db_path)?;

    let generator: Arc<dyn TextGenerator> = match &config.gemini_api_key {
        Some(key) => Arc::new(GeminiGenerator::new(
            &config.gemini_url,
            &config.gemini_model,
            key,
        )?),
        None => {
            warn!("GEMINI_API_KEY not set, daily quotes will use the fallback");
            Arc::new(Unconfigured)
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let dispatcher = Dispatcher::new();
    let state: AppState = Arc::new(AppStateInner {
        db,
        dispatcher: dispatcher.clone(),
        generator,
        policy: Arc::new(Denylist::default()),
        clock: clock.clone(),
        day_boundary: config.day_boundary,
    });

    let ambient = config
        .ambient
        .then(|| Ambient::start(dispatcher, clock, AmbientConfig::default()));

    info!("Tinig server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(ambient) = ambient {
        ambient.shutdown().await;
    }
    info!("Tinig server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
