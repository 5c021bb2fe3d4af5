use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

use lake_maps::shell::config::Settings;
use lake_maps::shell::http::{cors_layer, router};
use lake_maps::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    let state = AppState::from_settings(&settings).await?;
    let app = router(state).layer(cors_layer(&settings));

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(env = %settings.app_env, "listening on http://{addr}, GraphQL at /gql");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("could not listen for ctrl-c, shutting down");
    }
    tracing::info!("shutdown signal received");
}
