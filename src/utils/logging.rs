//! Diagnostic logging (stderr). User-facing output goes through
//! `ui::messages`; this is for `RUST_LOG`-driven tracing of core decisions.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level. Calling it twice is harmless (the second call is ignored).
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
