use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use bedrock_slackbot::config::BotConfig;
use bedrock_slackbot::logging;
use bedrock_slackbot::server;
use bedrock_slackbot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = BotConfig::from_env().context("Failed to load configuration")?;
    let port = config.port;
    let state = Arc::new(AppState::initialize(config).context("Failed to initialize clients")?);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    tracing::info!("⚡️ Slack bot is running on {}", listener.local_addr()?);

    let app: Router = server::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
