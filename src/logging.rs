//! Tracing subscriber setup for the binary

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Log line format on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_directive(verbose))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = match format {
        LogFormat::Text => builder.without_time().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "reqpad=info",
        2 => "reqpad=debug",
        _ => "reqpad=trace",
    }
}
