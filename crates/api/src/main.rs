use anyhow::Context;

use ledger_api::app::{build_app, services::build_services};
use ledger_api::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ledger_observability::init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let services = build_services(&config).await.context("failed to initialize account store")?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
