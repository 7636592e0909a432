mod config;
mod db;
mod error;
mod models;
mod operations;
mod server;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use db::connection::SqliteStore;
use db::record_store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = config::Args::parse();
    let store = SqliteStore::open(&args.db_path)?;
    tracing::info!(
        db_path = %args.db_path.display(),
        store_timeout_ms = args.store_timeout_ms,
        "record store opened"
    );

    let records = Arc::new(RecordStore::new(Arc::new(store), args.store_timeout()));
    server::serve(args.listen, records).await
}
