use std::sync::Arc;
use std::time::Duration;

use quiz_chat::{config::Config, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new(&config)?);

    {
        let sessions = state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                let removed = sessions.purge_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "purged idle sessions");
                }
            }
        });
    }

    let app = routes::create_router()
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;

    tracing::info!(
        address = %config.server_address,
        backend = %config.api_base_url,
        "quiz chat running"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
