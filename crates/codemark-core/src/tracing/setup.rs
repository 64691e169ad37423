//! `tracing-subscriber` installation with an `EnvFilter` read from `CODEMARK_LOG`.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Install the global fmt subscriber, falling back to `info` when
/// `CODEMARK_LOG` is unset or invalid.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
