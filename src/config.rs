//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// CLI arguments for the ledger server.
#[derive(Parser, Debug)]
#[command(name = "ledger", about = "Sales transaction ledger over HTTP")]
pub struct Args {
    /// SQLite file holding the records. Created on first start.
    #[arg(long, env = "LEDGER_DB_PATH", default_value = "sales_ledger.db")]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to.
    #[arg(long, env = "LEDGER_LISTEN", default_value = "127.0.0.1:8787")]
    pub listen: SocketAddr,

    /// Upper bound for a single store call, in milliseconds.
    #[arg(long, env = "LEDGER_STORE_TIMEOUT_MS", default_value_t = 5000)]
    pub store_timeout_ms: u64,
}

impl Args {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
