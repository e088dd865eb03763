//! Observability subsystem
//!
//! Structured JSON logging with typed lifecycle events.
//!
//! # Usage
//!
//! ```ignore
//! use couchload::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::UnitResolved, &[("name", "pkg.util")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::CachesInvalidated);
        log_event(Event::NamespacesRefreshed);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::UnitPushed, &[("name", "pkg.util"), ("namespace", "pyc_pkg")]);
    }
}
