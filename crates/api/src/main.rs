use anyhow::Context;

use loadstar_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    loadstar_observability::init();

    // No secret, no process. There is deliberately no dev-default fallback.
    let config = AppConfig::from_env()?;
    let port = config.port;

    let app = loadstar_api::app::build_app(config)?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{port}"))?;

    tracing::info!(port, "loadstar api listening");

    axum::serve(listener, app).await.context("server exited")?;

    Ok(())
}
