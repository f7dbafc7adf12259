mod api;
mod middleware;

use std::sync::Arc;

use localscout_core::Taxonomy;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = localscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let taxonomy = Arc::new(Taxonomy::load(config.taxonomy_path.as_deref())?);
    let state = AppState::from_config(&config, taxonomy)?;
    let app = build_app(state, &config.cors_origins);

    tracing::info!(
        environment = %config.env,
        bind_addr = %config.bind_addr,
        api_key_configured = config.has_places_api_key(),
        "local scout gateway starting"
    );
    if !config.has_places_api_key() {
        tracing::warn!("GOOGLE_PLACES_API_KEY not set; place searches will fail until it is configured");
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
