//! Subscriber setup for hosts that want to see the pipeline's `tracing`
//! events.
//!
//! The crates only emit events (`jiki::lexer`, `jiki::parser`,
//! `jiki::eval`, `jiki::interpreters`); nothing is printed until a host
//! installs a subscriber, e.g. with [`init_logging`].

use std::io;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

pub use tracing_subscriber::util::TryInitError;

/// Output format for [`init_logging`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored output for local debugging.
    Pretty,
    #[default]
    Compact,
    /// One JSON object per event, for tooling.
    Json,
}

/// The per-stage filter used when `RUST_LOG` is unset.
pub fn default_targets() -> Targets {
    Targets::new()
        .with_default(LevelFilter::WARN)
        .with_target("jiki::lexer", LevelFilter::INFO)
        .with_target("jiki::parser", LevelFilter::INFO)
        .with_target("jiki::eval", LevelFilter::INFO)
        .with_target("jiki::interpreters", LevelFilter::DEBUG)
}

/// Install a global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over [`default_targets`] when set. Fails if
/// a global subscriber is already installed.
pub fn init_logging(format: LogFormat) -> Result<(), TryInitError> {
    let layer = format_layer(format);
    let layer = match EnvFilter::try_from_default_env() {
        Ok(filter) => layer.with_filter(filter).boxed(),
        Err(_) => layer.with_filter(default_targets()).boxed(),
    };
    tracing_subscriber::registry().with(layer).try_init()
}

fn format_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .without_time()
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    }
}
