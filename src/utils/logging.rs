// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up tracing_subscriber, filtered by `RUST_LOG` (default "info").
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")); // Default to INFO level

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("Logging setup complete.");
}
