//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "appicon=info,appicon_search=info";

/// Directive used with `--verbose`.
pub const VERBOSE_FILTER: &str = "appicon=debug,appicon_search=debug";

/// Build the env filter. `RUST_LOG` wins over both defaults.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    })
}

/// Install the global subscriber writing to stderr.
///
/// Stdout stays reserved for command output. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
