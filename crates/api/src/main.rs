use anyhow::Context;

use storefront_api::{app, config::ServerConfig};
use storefront_observability::TracingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let tracing_config = TracingConfig::from_env().context("invalid logging configuration")?;
    storefront_observability::init(&tracing_config);

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let app = app::build_app(&config).context("failed to wire application services")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
