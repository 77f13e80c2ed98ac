//! Diagnostic logging to stderr.
//!
//! `RUST_LOG` wins when set; otherwise the filter comes from `log.level` in
//! the settings. Stdout stays reserved for shell output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogSettings;

const FALLBACK_FILTER: &str = "cadenza=info";

pub fn init(settings: &LogSettings) {
    let mut rejected_level = None;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&settings.level).unwrap_or_else(|err| {
            rejected_level = Some(err.to_string());
            EnvFilter::new(FALLBACK_FILTER)
        })
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // A subscriber may already be installed (tests, embedding); keep it.
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        return;
    }

    if let Some(err) = rejected_level {
        tracing::warn!(level = %settings.level, error = %err, "invalid log.level, using {FALLBACK_FILTER}");
    }
}
