//! Logging setup and span constructors.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the level; the default is `info`. Output goes to
/// stderr so it never interleaves with the console's stdout.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    use crate::network::{ConnectionId, ServerAddr};

    /// Span for a connection's read and write tasks.
    pub fn connection(id: ConnectionId, addr: &ServerAddr) -> Span {
        info_span!("connection", conn = %id, addr = %addr)
    }
}
