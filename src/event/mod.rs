mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::EditorEvent;
pub use handlers::{DirtySignal, DirtyTracker, EventLog};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}
