use tracing_subscriber::EnvFilter;

use repo_qa::api;
use repo_qa::config::Config;
use repo_qa::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Missing secrets abort here, before the listener binds.
    let config = Config::from_env()?;
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
