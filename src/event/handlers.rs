use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{EditorEvent, EventHandler};

/// Counter bumped on every change that should eventually be saved.
///
/// Shared between the [`DirtyTracker`] on the event bus and the autosave
/// scheduler, which compares generations to see whether anything happened.
#[derive(Debug, Clone, Default)]
pub struct DirtySignal {
    generation: Arc<Mutex<u64>>,
}

impl DirtySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) {
        *self.generation.lock() += 1;
    }

    pub fn generation(&self) -> u64 {
        *self.generation.lock()
    }
}

/// Bus handler that turns mutating events into dirty marks
#[derive(Debug)]
pub struct DirtyTracker {
    signal: DirtySignal,
}

impl DirtyTracker {
    pub fn new(signal: DirtySignal) -> Self {
        Self { signal }
    }
}

impl EventHandler for DirtyTracker {
    fn handle_event(&mut self, event: &EditorEvent) {
        if event.marks_dirty() {
            self.signal.mark();
        }
    }
}

/// Records every event it sees. Handy for tests and the debug window.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// A handler that appends into this log
    pub fn handler(&self) -> Box<dyn EventHandler> {
        Box::new(self.clone())
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.lock().push(event.clone());
    }
}
