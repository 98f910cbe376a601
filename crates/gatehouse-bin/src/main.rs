// ============================
// crates/gatehouse-bin/src/main.rs
// ============================
use std::sync::Arc;
use std::time::Duration;

use gatehouse_lib::{
    auth::MemorySessionStore,
    config::Settings,
    router,
    store::MemoryCredentialStore,
    AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()
        .or_else(|_| Settings::load_from("config/default.toml"))
        .unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let users = Arc::new(MemoryCredentialStore::new());
    let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(
        settings.session_ttl_secs,
    )));

    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(users, sessions, settings)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
