//! Log setup: human-readable or JSON lines on stderr. Machine output (ndjson) goes to stdout.

use serde::Serialize;
use std::io::Write;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct StructuredLogger;

impl StructuredLogger {
    /// Route `tracing` events to stderr so stdout stays free for reports and ndjson.
    /// `RUST_LOG` overrides `default_level`. A second call is a no-op.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let events = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        let registry = tracing_subscriber::registry().with(filter);
        let installed = if json {
            registry.with(events.json().flatten_event(true)).try_init()
        } else {
            registry.with(events).try_init()
        };
        if installed.is_err() {
            tracing::debug!("log subscriber already installed");
        }
    }

    /// Emit one JSON object per line without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)
    }
}
