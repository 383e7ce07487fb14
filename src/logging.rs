//! Tracing setup for the binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const STANDARD_ENV_VAR: &str = "RUST_LOG";

/// Result type for `filter_for()`
struct FilterResult {
    filter: EnvFilter,
    used_env: bool,
}

/// Use `RUST_LOG` if set; otherwise log only this crate at `trace_level`.
fn filter_for(trace_level: &str) -> anyhow::Result<FilterResult> {
    EnvFilter::try_from_env(STANDARD_ENV_VAR)
        .map(|filter| FilterResult {
            filter,
            used_env: true,
        })
        .or_else(|e| {
            // The env var was unset or invalid. Which is it?
            if std::env::var(STANDARD_ENV_VAR).is_ok() {
                anyhow::bail!("{STANDARD_ENV_VAR} (set in environment) was invalid: {e}");
            }
            Ok(FilterResult {
                filter: EnvFilter::new(format!("{}={trace_level}", env!("CARGO_CRATE_NAME"))),
                used_env: false,
            })
        })
}

/// Install a compact stderr subscriber.
///
/// With the default `warn` level a successful run prints nothing.
///
/// **CAUTION:** If this function fails, tracing won't be set up; callers must take extra care to report the error.
pub fn setup(trace_level: &str) -> anyhow::Result<()> {
    let filter = filter_for(trace_level)?;
    // Only show targets when the user chose the filter; otherwise everything is ours.
    let layer = fmt::layer()
        .compact()
        .with_target(filter.used_env)
        .with_writer(std::io::stderr)
        .with_filter(filter.filter);

    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}
