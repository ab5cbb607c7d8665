use anyhow::Context;
use hospitality_marketplace::config::RelayConfig;
use hospitality_marketplace::http::HttpClient;
use hospitality_marketplace::session::Session;
use hospitality_marketplace::webhook::{router, RelayState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env().context("loading relay configuration")?;
    config.api.validate()?;

    let session = Arc::new(Session::for_config(&config.api, None));
    let http = HttpClient::new(&config.api, session).context("building backend client")?;

    let app = router(RelayState {
        http,
        forward_path: config.forward_path.clone(),
    });

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!(
        "Webhook relay listening on {}, forwarding to {}/{}",
        bind_addr, config.api.base_url, config.forward_path
    );

    axum::serve(listener, app).await?;
    Ok(())
}
