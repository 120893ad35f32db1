use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use chronos_api::{build_state, build_router, AppConfig};
use chronos_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("chronos_api");

    let bind = env::var("CHRONOS_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let config = AppConfig::from_env();
    let state = build_state(config)?;

    let agent = state.agent.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(300));
        loop {
            ticker.tick().await;
            match agent.purge_expired_sessions().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "expired sessions purged"),
                Err(err) => tracing::warn!(error = %err, "session purge failed"),
            }
        }
    });

    let mode = state.agent.completion_mode();
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, completion = mode, "chronos api started");

    axum::serve(listener, app).await?;
    Ok(())
}
