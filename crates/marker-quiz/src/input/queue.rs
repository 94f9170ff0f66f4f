use crate::api::types::Slot;

/// Events delivered by the tracker and the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingEvent {
    /// The marker bound to `slot` became visible.
    TargetFound { slot: Slot },
    /// The marker bound to `slot` is no longer visible.
    TargetLost { slot: Slot },
    /// The player pressed the restart button.
    Restart,
}

/// A queue of tracking events.
/// DOM callbacks push into the queue; the runner drains it once per frame,
/// so callbacks never re-enter the controller.
pub struct TrackingQueue {
    events: Vec<TrackingEvent>,
}

impl TrackingQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: TrackingEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<TrackingEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for TrackingQueue {
    fn default() -> Self {
        Self::new()
    }
}
