//! ssm: a small system monitor with live CPU, RAM, network, battery and uptime,
//! plus junk cleanup and power controls.
//!
//! Run with:  `RUST_LOG=info ssm`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging on stderr; RUST_LOG controls verbosity (default: info).
    // stdout belongs to the dashboard.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("ssm v{} starting", env!("CARGO_PKG_VERSION"));

    ssm_app::run().await
}
