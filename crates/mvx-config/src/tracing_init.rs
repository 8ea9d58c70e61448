//! `tracing-subscriber` wiring. This is the only place `MVX_VERBOSE` and
//! `MVX_NO_COLOR` are read directly; everything else goes through
//! [`RuntimeConfig`](crate::RuntimeConfig) or plain `tracing` macros.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize a global `tracing` subscriber.
///
/// Priority, mirroring the teacher's `vx-cli::tracing_setup::init_tracing`:
/// `RUST_LOG` (if set) > `MVX_VERBOSE=true` (`<crate>=debug,info`) > default
/// (`<crate>=info,warn,error`). `MVX_NO_COLOR` disables ANSI color codes.
/// Safe to call more than once; only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let verbose = std::env::var("MVX_VERBOSE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let no_color = std::env::var("MVX_NO_COLOR")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let env_filter = if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::EnvFilter::from_default_env()
        } else if verbose {
            tracing_subscriber::EnvFilter::new("mvx=debug,info")
        } else {
            tracing_subscriber::EnvFilter::new("mvx=info,warn,error")
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(!no_color)
            .with_target(verbose)
            .try_init()
            .ok();
    });
}
