//! Logging bootstrap for booklib processes.

use booklib_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `settings.filter`. Returns `false` when a
/// subscriber was already installed (e.g. by a test harness), which is not an
/// error.
pub fn init(settings: &TelemetrySettings) -> bool {
    let filter = build_filter(settings);

    let installed = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::debug!(
            target: "booklib-telemetry",
            format = ?settings.log_format,
            "tracing subscriber installed"
        );
    }

    installed
}

fn build_filter(settings: &TelemetrySettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = settings.filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let settings = TelemetrySettings::default();
        let _ = init(&settings);
        assert!(!init(&settings));
    }

    #[test]
    fn invalid_filter_falls_back_to_default() {
        let settings = TelemetrySettings {
            log_format: LogFormat::Json,
            filter: Some("=[not a directive".to_string()),
        };
        // Must not panic even with a garbage directive.
        let _ = build_filter(&settings);
    }
}
