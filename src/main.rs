use std::sync::Arc;

use pokedex_catalog::{
    Config, PokeApiClient,
    server::{AppState, router},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match PokeApiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build PokeAPI client: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Using PokeAPI at {}", client.api_url());

    let app_state = Arc::new(AppState::new(client, &config));

    match app_state.load_next_page(false).await {
        Ok(outcome) => match outcome.summary.error {
            Some(error) => tracing::warn!("Initial load failed, retry with POST /reload: {}", error),
            None => tracing::info!("Initial load added {} families", outcome.added),
        },
        Err(e) => tracing::error!("Initial load failed: {}", e),
    }

    let app = router(app_state);

    let listener = match tokio::net::TcpListener::bind(&config.server.address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", config.server.address, e);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(addr) => tracing::info!("listening on {}", addr),
        Err(e) => tracing::warn!("Listening, but local address is unavailable: {}", e),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
