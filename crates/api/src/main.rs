use std::sync::Arc;

use anyhow::Context;

use hbnb_api::config::ApiConfig;
use hbnb_infra::{Facade, ensure_admin};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hbnb_observability::init();

    let config = ApiConfig::from_env()?;

    let facade = Arc::new(Facade::new());
    if let Some(seed) = &config.bootstrap_admin {
        ensure_admin(&facade, seed).context("failed to bootstrap admin account")?;
    }

    let app = hbnb_api::app::build_app(&config, facade);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
