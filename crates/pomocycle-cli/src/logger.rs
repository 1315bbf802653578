use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs go to stderr so stdout stays a clean stream of JSON events.
///
/// `POMOCYCLE_LOG` takes precedence over `RUST_LOG`.
pub fn init_cli_logger(verbose: bool) {
    let fallback = if verbose {
        "pomocycle=debug,pomocycle_core=debug,info"
    } else {
        "pomocycle=info,pomocycle_core=info,warn"
    };
    let filter = EnvFilter::try_from_env("POMOCYCLE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
