pub mod config;
pub mod dashboard;
pub mod export;
pub mod fdr;
pub mod fetch;
pub mod http_client;
pub mod model;
pub mod pipeline;
pub mod player_stats;
pub mod store;
pub mod transform;

use tracing_subscriber::EnvFilter;

/// Stderr logging filtered by `RUST_LOG`, `info` when unset.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
