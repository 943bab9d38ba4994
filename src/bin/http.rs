#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use post_scheduler::{SchedulerConfig, http_api};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("POST_SCHEDULER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = SchedulerConfig::from_env()?;
    let state = match std::env::var("POST_SCHEDULER_DB") {
        #[cfg(feature = "sqlite")]
        Ok(path) if !path.trim().is_empty() => {
            let store = post_scheduler::SqliteSlotStore::new(path.trim())?;
            tracing::info!(db = %path.trim(), "occupancy backed by sqlite");
            http_api::AppState::with_store(config, std::sync::Arc::new(store))?
        }
        _ => http_api::AppState::new(config),
    };
    tracing::info!(%addr, "post-scheduler HTTP API listening");
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
