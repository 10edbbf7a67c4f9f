use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber once per process.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output when `verbose` is on.
pub fn init(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default = if verbose {
            "paywizard=debug"
        } else {
            "paywizard=warn"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        // A test harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
