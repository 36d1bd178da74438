//! Narration produced while a battle resolves.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Append-only destination for narration. The engine never reads back what
/// it wrote.
pub trait EventSink {
    fn record(&mut self, severity: Severity, message: String);

    fn info(&mut self, message: String) {
        self.record(Severity::Info, message);
    }
}

impl EventSink for Vec<BattleEvent> {
    fn record(&mut self, severity: Severity, message: String) {
        self.push(BattleEvent { severity, message });
    }
}

/// Collects events and mirrors each one into `tracing`.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn record(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Info => info!(target: "skirmish_core.events", "{message}"),
            Severity::Warn => warn!(target: "skirmish_core.events", "{message}"),
            Severity::Error => error!(target: "skirmish_core.events", "{message}"),
        }
        self.events.push(BattleEvent { severity, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_order_and_drains() {
        let mut log = EventLog::new();
        log.info("first".into());
        log.record(Severity::Error, "second".into());
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[1].to_string(), "[ERROR] second");

        let drained = log.drain();
        assert_eq!(drained[0].message, "first");
        assert!(log.is_empty());
    }
}
