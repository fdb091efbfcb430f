//! crates/daemon-log/src/tracing_bridge.rs
//! Bridge from the tracing crate into the daemon logger.
//!
//! [`LoggerLayer`] is a tracing-subscriber layer that forwards events to a
//! [`Logger`], so code written against `tracing` macros shares the logger's
//! filters and destinations.
//!
//! # Mapping
//!
//! - The event target selects the category through
//!   [`Category::from_target`], falling back to [`Category::Misc`].
//! - `ERROR` maps to [`Severity::Log`], never to [`Severity::Fatal`]; a
//!   tracing event cannot terminate the process.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use daemon_log::{Logger, init_tracing};
//!
//! let logger = Arc::new(Logger::builder().threshold(5).build()?);
//! init_tracing(Arc::clone(&logger));
//!
//! tracing::info!(target: "daemon::storage", "index rebuilt");
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::category::Category;
use crate::levels::Severity;
use crate::logger::Logger;

/// A tracing layer that hands events to a [`Logger`].
#[derive(Debug)]
pub struct LoggerLayer {
    logger: Arc<Logger>,
}

impl LoggerLayer {
    /// Creates a layer writing to `logger`.
    #[must_use]
    pub const fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Map a tracing level to a logger severity.
    const fn level_to_severity(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Log,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            Level::DEBUG => Severity::Debug,
            Level::TRACE => Severity::Spam,
        }
    }

    fn target_to_category(target: &str) -> Category {
        Category::from_target(target).unwrap_or(Category::Misc)
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Self::level_to_severity(metadata.level());
        let category = Self::target_to_category(metadata.target());

        if !self.logger.enabled(severity, category) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.logger.log(severity, category, visitor.finish());
    }
}

/// Collects the `message` field followed by any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Installs a global subscriber that forwards every event to `logger`.
///
/// Panics if a global subscriber is already installed, matching
/// `tracing_subscriber`'s `init`.
pub fn init_tracing(logger: Arc<Logger>) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger))
        .init();
}

/// Like [`init_tracing`], with an extra filter layer (for example an
/// `EnvFilter`) in front of the logger's own filters.
pub fn init_tracing_with_filter<F>(logger: Arc<Logger>, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(LoggerLayer::new(logger))
        .init();
}
