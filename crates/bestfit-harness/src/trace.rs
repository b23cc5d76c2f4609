//! JSONL trace emission for manager lifecycle events.

use std::io::{self, Write};

use bestfit_core::{EventKind, ManagerEvent};
use serde::{Deserialize, Serialize};

/// Serializable view of one [`ManagerEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Monotonic decision id.
    pub sequence: u64,
    /// Event kind.
    pub event: TraceEventKind,
    /// Starting address involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<u64>,
    /// Size involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Machine-readable outcome label.
    pub outcome: String,
}

/// Event kind, lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceEventKind {
    Allocate,
    Free,
    Merge,
}

impl From<&ManagerEvent> for TraceRecord {
    fn from(event: &ManagerEvent) -> Self {
        Self {
            sequence: event.sequence,
            event: match event.kind {
                EventKind::Allocate => TraceEventKind::Allocate,
                EventKind::Free => TraceEventKind::Free,
                EventKind::Merge => TraceEventKind::Merge,
            },
            addr: event.addr,
            size: event.size,
            outcome: event.outcome.to_owned(),
        }
    }
}

/// Writes one JSON object per line for each event.
pub fn write_jsonl<W: Write>(events: &[ManagerEvent], writer: &mut W) -> io::Result<()> {
    for event in events {
        let record = TraceRecord::from(event);
        let line = serde_json::to_string(&record)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestfit_core::MemoryManager;

    #[test]
    fn emits_one_json_object_per_event() {
        let mut manager = MemoryManager::new(10);
        let id = manager.allocate(3).unwrap();
        manager.free(id);
        let events = manager.take_events();

        let mut buffer = Vec::new();
        write_jsonl(&events, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), events.len());

        let first: TraceRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.event, TraceEventKind::Allocate);
        assert_eq!(first.outcome, "split");
        assert_eq!(first.addr, Some(1));
    }

    #[test]
    fn failure_events_omit_the_address_field() {
        let mut manager = MemoryManager::new(2);
        manager.allocate(5);
        let events = manager.take_events();

        let mut buffer = Vec::new();
        write_jsonl(&events, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"outcome\":\"failed\""));
        assert!(!text.contains("\"addr\""));
    }
}
