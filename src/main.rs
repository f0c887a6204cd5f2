//! Sized LRU - artwork cache demo
//!
//! Warms a byte-bounded artwork cache from a directory and prints an
//! occupancy report as JSON.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sized_lru::{ArtworkRepository, Config};

/// Main entry point for the artwork cache demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the artwork repository with the configured byte budget
/// 4. Warm the cache from the artwork directory
/// 5. Optionally shrink the cache to the trim budget
/// 6. Print the occupancy report
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sized_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: artwork_dir={}, max_bytes={}, trim_bytes={:?}",
        config.artwork_dir.display(),
        config.max_bytes,
        config.trim_bytes
    );

    let repository =
        ArtworkRepository::from_config(&config).context("Failed to create artwork cache")?;

    repository
        .warm_dir(&config.artwork_dir)
        .with_context(|| format!("Failed to read {}", config.artwork_dir.display()))?;

    if let Some(trim_bytes) = config.trim_bytes {
        repository
            .resize(trim_bytes)
            .context("Failed to resize artwork cache")?;
    }

    let report = repository.report();
    info!(
        "Cache holds {} entries, {}/{} bytes ({:.1}%)",
        report.entry_count,
        report.occupied_size,
        report.max_size,
        report.utilization() * 100.0
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
