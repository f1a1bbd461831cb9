//! Tallyboard server binary.
//!
//! Runs the leaderboard API on the address in `TALLYBOARD_ADDR`
//! (default `127.0.0.1:8080`), backed by the in-memory store. Log
//! verbosity follows `RUST_LOG`.

use std::sync::Arc;

use tallyboard::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), TallyboardError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("TALLYBOARD_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let server = ServerBuilder::new()
        .bind(&addr)
        .build(Arc::new(MemoryStore::new()))
        .await?;

    if let Ok(local) = server.local_addr() {
        tracing::info!(addr = %local, "tallyboard listening");
    }
    server.run().await
}
