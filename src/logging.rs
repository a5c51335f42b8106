//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
//! Logs go to stderr so stdout carries only command output.

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default = if verbose { "twoday=debug" } else { "twoday=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
