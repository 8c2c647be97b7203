//! Activity logging: optional JSONL event stream with graceful degradation.

pub mod jsonl;

use crate::core::errors::OstError;
use crate::daemon::rotation::DetailMode;
use crate::monitor::reading::Unavailable;
use jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

/// Event sink used by the main loop. Disabled when no path is configured.
pub struct ActivityLog {
    writer: Option<JsonlWriter>,
}

impl ActivityLog {
    #[must_use]
    pub const fn disabled() -> Self {
        Self { writer: None }
    }

    #[must_use]
    pub fn open(config: JsonlConfig) -> Self {
        Self {
            writer: Some(JsonlWriter::open(config)),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn daemon_start(&mut self, modes: &[DetailMode], config_hash: &str, sink: &str) {
        let tokens: Vec<&str> = modes.iter().map(|m| m.token()).collect();
        let entry = LogEntry::new(EventType::DaemonStart, Severity::Info).with_details(format!(
            "modes={} sink={sink} config_hash={config_hash}",
            tokens.join(",")
        ));
        self.emit(&entry);
    }

    pub fn mode_change(&mut self, tick: u64, from: DetailMode, to: DetailMode) {
        let mut entry = LogEntry::new(EventType::ModeChange, Severity::Info).at_tick(tick);
        entry.previous_mode = Some(from.token().to_string());
        entry.mode = Some(to.token().to_string());
        self.emit(&entry);
    }

    pub fn source_unavailable(&mut self, tick: u64, source: &str, reason: &Unavailable) {
        let mut entry =
            LogEntry::new(EventType::SourceUnavailable, Severity::Warning).at_tick(tick);
        entry.source = Some(source.to_string());
        entry.reason = Some(reason.label().to_string());
        entry.details = Some(reason.to_string());
        self.emit(&entry);
    }

    pub fn source_recovered(&mut self, tick: u64, source: &str) {
        let mut entry = LogEntry::new(EventType::SourceRecovered, Severity::Info).at_tick(tick);
        entry.source = Some(source.to_string());
        self.emit(&entry);
    }

    pub fn display_fault(&mut self, tick: u64, error: &OstError) {
        let mut entry = LogEntry::new(EventType::DisplayFault, Severity::Critical).at_tick(tick);
        entry.error_code = Some(error.code().to_string());
        entry.details = Some(error.to_string());
        self.emit(&entry);
    }

    fn emit(&mut self, entry: &LogEntry) {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_entry(entry);
        }
    }
}
