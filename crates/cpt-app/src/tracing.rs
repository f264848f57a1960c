//! Logging setup for the tracker.
//!
//! Logs always go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` overrides the per-environment defaults, e.g.
//! `RUST_LOG=cpt_app=trace`.

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::Environment;

/// Install the global subscriber for `env`.
///
/// Development gets pretty output with source locations at DEBUG; production
/// gets flattened JSON events at INFO. Calling this twice only reports the
/// second attempt on stderr.
pub fn init_tracing(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match env {
        Environment::Development => fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .boxed(),
        Environment::Production => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .flatten_event(true)
            .boxed(),
    };

    match tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
    {
        Ok(()) => tracing::debug!(?env, "Tracing initialized"),
        Err(e) => eprintln!("Tracing already initialized: {e}"),
    }
}

/// Directives used when `RUST_LOG` is unset; HTTP client internals stay quiet.
const fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Development => "debug,hyper_util=info,reqwest=info,rustls=info",
        Environment::Production => "info,hyper_util=warn,reqwest=warn",
    }
}
