use std::io;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` for this crate when
/// `verbose` is on. Logs go to stderr so listings on stdout stay clean.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "info,tarot_booking=debug"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
