use crate::canvas::Canvas;
use crate::event::EventBus;

/// What a history action may touch while being applied: the live canvas and the
/// event bus that announces the change.
#[derive(Debug)]
pub struct CommandContext<'a> {
    pub canvas: &'a mut Canvas,
    pub event_bus: &'a EventBus,
}

impl<'a> CommandContext<'a> {
    pub fn new(canvas: &'a mut Canvas, event_bus: &'a EventBus) -> Self {
        Self { canvas, event_bus }
    }
}
