//! Oracle cranker binary

use anyhow::Result;
use oracle_cranker::{run, Config};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        rpc_url = %config.rpc_url,
        wallet = %config.wallet_path,
        poll_interval_secs = config.poll_interval_secs,
        max_retries = config.max_retries,
        "Oracle cranker configuration"
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let service = run(config, Arc::clone(&shutdown));
    tokio::pin!(service);

    tokio::select! {
        result = &mut service => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down after the current round");
            shutdown.store(true, Ordering::Relaxed);
            service.await
        }
    }
}
