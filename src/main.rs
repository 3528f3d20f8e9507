use anyhow::Context;
use estate_agent::store::{seed_roles, DocumentStore, InMemoryStore};
use estate_agent::validation::Validators;
use estate_agent::{build_router, AppConfig, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env_or_yaml().context("loading configuration")?;

    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
    let roles = seed_roles(store.as_ref()).await.context("seeding roles")?;
    info!(
        backend = store.backend_name(),
        roles = roles.len(),
        "store ready"
    );

    let validators = Validators::compile().context("compiling request schemas")?;
    let state = AppState::new(store, &config, validators);
    let app = build_router(state, &config.cors_origin);

    let addr = config.bind_addr;
    info!(%addr, "estate agent api listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
