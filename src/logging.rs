//! Diagnostic logging for the runner itself.
//!
//! Report lines never go through here; this is a `tracing` trace of what the
//! runner is doing (fixtures starting and finishing, trapped faults, the
//! final tally), written to stderr and switched on with `VOUCH_LOG`, e.g.
//! `VOUCH_LOG=debug`.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "VOUCH_LOG";

/// Installs the stderr subscriber once per process. Does nothing when a
/// global subscriber is already set.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init();
    });
}
