use std::sync::Arc;

use anyhow::Context;

use pirs_api::config::ApiConfig;
use pirs_engine::{seed, InventoryEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pirs_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let engine = Arc::new(InventoryEngine::new(config.engine.clone()));

    if config.seed_demo {
        let catalog = seed::demo_catalog().context("building demo catalog")?;
        let added = engine.load_catalog(catalog).context("loading demo catalog")?;
        tracing::info!(added, "demo catalog seeded");
        for lot in seed::demo_blocked_lots().context("building demo lot list")? {
            engine.block_lot(lot).context("blocking demo lot")?;
        }
    }

    let app = pirs_api::app::build_app(engine);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
