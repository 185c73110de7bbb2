//! t2sweb crate entrypoint.
//!
//! Starts the Tokio runtime, wires up the access log, and launches the web
//! server defined in the `server` module. Keep this file minimal — most
//! application logic lives in `server`, `config`, and `logging`.
//!
/// HTTP server implementation and request handling
mod server;
/// Configuration management and settings
mod config;
/// Access log rotation and tracing subscriber setup
mod logging;

use crate::config::CONFIG;

/// Entry point for the async Tokio runtime
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(&CONFIG)?;
    server::run().await
}
