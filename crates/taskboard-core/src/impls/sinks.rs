use std::sync::{Arc, Mutex};

use crate::domain::{BoardEvent, BoardSnapshot};
use crate::ports::EventSink;

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&mut self, _event: &BoardEvent, _snapshot: &BoardSnapshot) {}
}

/// One event as seen by a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub event: BoardEvent,
    pub snapshot: BoardSnapshot,
}

/// Keeps every event in a shared buffer.
///
/// Clone the sink before handing it to the manager and read the buffer
/// through the clone.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<RecordedEvent> {
        self.events
            .lock()
            .ok()
            .and_then(|events| events.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&mut self, event: &BoardEvent, snapshot: &BoardSnapshot) {
        if let Ok(mut events) = self.events.lock() {
            events.push(RecordedEvent {
                event: event.clone(),
                snapshot: snapshot.clone(),
            });
        }
    }
}
