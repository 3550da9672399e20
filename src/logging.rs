//! Diagnostic logging setup for the `securevault` binary.
//!
//! The library only emits `tracing` events.  The binary installs a
//! compact `fmt` subscriber on stderr so diagnostics never mix with
//! command output on stdout.  Secret values are never logged.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "SECUREVAULT_LOG";

/// Install the global subscriber.
///
/// `SECUREVAULT_LOG` wins when set; otherwise the level is `debug` with
/// `--verbose` and `warn` without.  Calling this twice is harmless.
pub fn init(verbose: bool) {
    let fallback = if verbose { "securevault=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
