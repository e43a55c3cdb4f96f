use anyhow::Context;
use risk_engine_server::logging::init_tracing;
use risk_engine_server::{RiskServer, ServerConfig};

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("failed to read configuration")?;
    init_tracing(config.log_format).context("failed to install tracing subscriber")?;

    tracing::info!(storage = ?config.storage, "opening evaluation store");
    let server = RiskServer::new(&config).context("failed to open evaluation store")?;
    tracing::info!(stats = %server.store_stats(), "evaluation store ready");
    server
        .serve_http(&config.http_addr)
        .with_context(|| format!("failed to serve http on {}", config.http_addr))
}
