//! Log-based event and telemetry sink adapter.
//!
//! Implements [`EventSink`] and [`TelemetrySink`] by writing to the `log`
//! facade.  Event severity picks the log level; telemetry goes to `debug`.

use log::{Level, debug, log};

use crate::app::events::{AppEvent, Severity};
use crate::app::ports::{EventSink, TelemetrySink};
use crate::app::telemetry::Telemetry;

/// Adapter that logs every event and telemetry write, tagged with the
/// emitting component's name.
pub struct LogEventSink {
    component: &'static str,
}

impl LogEventSink {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

/// Log level for an event severity.
pub fn level_for(severity: Severity) -> Level {
    match severity {
        Severity::WarningHi | Severity::WarningLo => Level::Warn,
        Severity::ActivityHi => Level::Info,
        Severity::ActivityLo => Level::Debug,
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        log!(
            level_for(event.severity()),
            "EVENT | {} | {} | {} | {}",
            self.component,
            event.severity(),
            event.name(),
            event
        );
    }
}

impl TelemetrySink for LogEventSink {
    fn record(&mut self, telemetry: &Telemetry) {
        debug!("TELEM | {} | {}", self.component, telemetry);
    }
}
