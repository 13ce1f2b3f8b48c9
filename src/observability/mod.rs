//! Observability for pathstore
//!
//! - Structured JSON log lines with typed events
//! - Per-store operation counters
//!
//! Observability is read-only: nothing here changes what an operation does.
//!
//! ```ignore
//! use pathstore::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::LeafCreated, &[("tag", "offset")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event with fields. Fatal events log at FATAL, everything else at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    if event.is_fatal() {
        Logger::fatal(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(Event::StoreOpen);
        log_event_with_fields(Event::NodeCreated, &[("tag", "cal")]);
    }

    #[test]
    fn test_fatal_event_line() {
        let line = super::logger::capture_log(Severity::Fatal, Event::BackendCorruption.as_str(), &[]);
        assert!(line.contains("BACKEND_CORRUPTION"));
        assert!(line.contains("FATAL"));
    }
}
