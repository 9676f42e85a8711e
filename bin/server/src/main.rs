use std::sync::Arc;
use talkfinder_core::Result;
use talkfinder_schedule::JoindInClient;
use talkfinder_server::config::ServerConfig;
use talkfinder_server::error::ServerError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load().map_err(|e| ServerError::Config {
        details: e.to_string(),
    })?;
    tracing::info!(
        event_id = config.schedule.event_id,
        talk_count = config.schedule.talk_count,
        "loaded configuration"
    );

    let source = JoindInClient::new(&config.schedule).map_err(|e| ServerError::Skill {
        details: e.to_string(),
    })?;
    let engine = talkfinder_skill::engine(Arc::new(source), config.schedule.talk_count)
        .map_err(|e| ServerError::Skill {
            details: e.to_string(),
        })?;

    let app = talkfinder_server::router(Arc::new(engine));

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServerError::Bind {
            address: address.clone(),
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve {
            details: e.to_string(),
        })?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
