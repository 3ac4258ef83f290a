//! Logging initialization.
//!
//! The filter comes from `RUST_LOG`, then `PETDOOR_LOG`, then `info`.
//! Output is compact text on stdout, or one JSON object per line when
//! requested.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable consulted when `RUST_LOG` is unset.
pub const LOG_ENV: &str = "PETDOOR_LOG";

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter cannot be parsed or a subscriber is
/// already installed.
pub fn init(json: bool) -> anyhow::Result<()> {
    let env_filter = build_filter(std::env::var(LOG_ENV).ok().as_deref())?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(true))
            .try_init()?;
    }

    Ok(())
}

fn build_filter(fallback: Option<&str>) -> anyhow::Result<EnvFilter> {
    let level = fallback.unwrap_or("info");
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?)
}
