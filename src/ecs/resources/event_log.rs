use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::IdGenerator;
use crate::model::EventKind;

/// One audit-trail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub kind: EventKind,
    pub at_ms: u64,
    pub description: String,
    pub data: serde_json::Value,
}

/// Accumulates log entries for the session.
#[derive(Resource, Debug, Clone, Default)]
pub struct EventLog {
    pub entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with a fresh id and return that id.
    pub fn record(
        &mut self,
        id_gen: &mut IdGenerator,
        kind: EventKind,
        at_ms: u64,
        description: impl Into<String>,
        data: serde_json::Value,
    ) -> u64 {
        let id = id_gen.next_id();
        self.entries.push(LogEntry {
            id,
            kind,
            at_ms,
            description: description.into(),
            data,
        });
        id
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_assigns_sequential_ids() {
        let mut log = EventLog::new();
        let mut id_gen = IdGenerator::new();
        let a = log.record(&mut id_gen, EventKind::Construction, 0, "a", serde_json::Value::Null);
        let b = log.record(&mut id_gen, EventKind::Upgrade, 50, "b", serde_json::json!({"level": 2}));
        assert_eq!((a, b), (1, 2));
        assert_eq!(log.count(EventKind::Upgrade), 1);
        assert_eq!(log.last().map(|e| e.at_ms), Some(50));
    }
}
