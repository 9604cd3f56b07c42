//! Centralised tracing initialisation for dropship binaries.
//!
//! Call [`init_tracing`] once at program start. Prompts and reconciliation
//! reports go to the operator through the confirmation gate; everything
//! else (decisions, prunes, command output) is traced, so verbosity is the
//! operator's window into why an artifact was or wasn't written.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json` — when `true`, emit newline-delimited JSON log lines.
/// * `verbose` — repeat count from the CLI: 0 warn, 1 info, 2 debug,
///   3+ trace. `RUST_LOG` overrides this when set.
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing(json: bool, verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
